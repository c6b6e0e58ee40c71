//! Caller arguments → request options.
//!
//! Splits an argument map into query, form and body payloads according to
//! each parameter's declared location.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ActionError;
use crate::spec::{display_value, Location, ParameterSpec};
use crate::transport::RequestOptions;

/// Declared parameters of one action keyed by the name callers use.
///
/// Body parameters are keyed as `"body"`.
pub type ParameterMap = IndexMap<String, ParameterSpec>;

/// Index an operation's parameters by call-time key.
pub fn parameter_map(parameters: &[ParameterSpec]) -> ParameterMap {
    parameters
        .iter()
        .map(|p| (p.key().to_string(), p.clone()))
        .collect()
}

/// Fail unless `value` matches one of the parameter's allowed values,
/// ignoring case.
pub fn validate_enum(key: &str, spec: &ParameterSpec, value: &Value) -> Result<(), ActionError> {
    let Some(allowed) = &spec.allowed else {
        return Ok(());
    };
    let provided = display_value(value).to_lowercase();
    if allowed.iter().any(|a| a.to_lowercase() == provided) {
        Ok(())
    } else {
        Err(ActionError::EnumValidation {
            parameter: key.to_string(),
            allowed: allowed.iter().map(|a| a.to_lowercase()).collect(),
        })
    }
}

/// Route every provided argument by its declared location.
///
/// Path parameters are validated but not routed; they are substituted into
/// the path by the caller. Arguments with no declared parameter are skipped.
pub fn classify(
    declared: &ParameterMap,
    provided: &Map<String, Value>,
) -> Result<RequestOptions, ActionError> {
    let mut options = RequestOptions::default();

    for (key, value) in provided {
        let Some(spec) = declared.get(key) else {
            debug!(parameter = %key, "ignoring undeclared argument");
            continue;
        };
        validate_enum(key, spec, value)?;

        match spec.location {
            Location::Query => {
                options.params.insert(key.clone(), value.clone());
            }
            Location::FormData => options.form.push((key.clone(), display_value(value))),
            Location::Body => options.body = Some(value.clone()),
            Location::Path => {}
        }
    }

    Ok(options)
}
