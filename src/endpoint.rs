//! Endpoints and their synthesized actions.
//!
//! An `Endpoint` owns one path template and builds one `Action` per
//! declared verb. An `Action` is an immutable descriptor; `Action::invoke`
//! is the single generic invoker that validates arguments, fills in the
//! path template and hands the request to a `Transport`.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ActionError, RegistryError};
use crate::naming::{synthesize_name, Disambiguation};
use crate::params::{classify, parameter_map, validate_enum, ParameterMap};
use crate::spec::{display_value, PathItem, ResponseMap, Verb};
use crate::transport::{RequestOptions, ResponseData, ResponseType, Transport};

/// One callable (path, verb) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    verb: Verb,
    path: String,
    path_prefix: String,
    parameters: ParameterMap,
    responses: ResponseMap,
}

impl Action {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Path template as declared in the document.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared parameters keyed by call-time name.
    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    fn requires_body(&self) -> bool {
        self.parameters.contains_key("body")
    }

    fn response_type(&self) -> ResponseType {
        let streams_file = self
            .responses
            .ok()
            .is_some_and(|ok| ok.description.to_lowercase().contains("filestream"));
        if streams_file {
            ResponseType::Blob
        } else {
            ResponseType::Json
        }
    }

    /// Check `args` against the declared parameters and build the request.
    pub fn prepare(&self, args: &Map<String, Value>) -> Result<(String, RequestOptions), ActionError> {
        let declared: Vec<String> = self.parameters.keys().cloned().collect();
        let provided: Vec<String> = args.keys().cloned().collect();

        if !declared.is_empty() && args.is_empty() {
            return Err(ActionError::MissingParameters { expected: declared });
        }
        if self.requires_body() && !args.contains_key("body") {
            return Err(ActionError::MissingBodyParameter { provided });
        }
        if !declared.iter().all(|name| args.contains_key(name)) {
            let unknown: Vec<String> = provided
                .iter()
                .filter(|name| !self.parameters.contains_key(*name))
                .cloned()
                .collect();
            let offending = if unknown.is_empty() { provided } else { unknown };
            return Err(ActionError::InvalidParameterNames {
                provided: offending,
            });
        }

        let mut options = if self.requires_body() {
            for (key, value) in args {
                if let Some(spec) = self.parameters.get(key) {
                    validate_enum(key, spec, value)?;
                }
            }
            RequestOptions {
                body: args.get("body").cloned(),
                ..RequestOptions::default()
            }
        } else {
            classify(&self.parameters, args)?
        };
        options.response_type = self.response_type();

        let path = request_path(&self.path, &self.path_prefix, args);
        Ok((path, options))
    }

    /// Validate `args`, dispatch through `transport` and return the
    /// response data.
    pub async fn invoke(
        &self,
        transport: &dyn Transport,
        args: &Map<String, Value>,
    ) -> Result<ResponseData, ActionError> {
        let (path, options) = self.prepare(args)?;
        debug!(action = %self.name, verb = %self.verb, %path, "invoking action");

        let payload = options.to_value();
        match transport.request(self.verb, &path, options).await {
            Ok(response) => Ok(response.data),
            Err(source) => {
                warn!(action = %self.name, %path, error = %source, "upstream request failed");
                Err(ActionError::UpstreamRequest {
                    path,
                    payload,
                    source,
                })
            }
        }
    }
}

/// Remove `prefix` from the front of `template` and fill `{name}`
/// placeholders from `args`.
///
/// Placeholders without a (non-null) value are left in place.
pub fn request_path(template: &str, prefix: &str, args: &Map<String, Value>) -> String {
    let mut path = strip_prefix(template, prefix).to_string();
    for (name, value) in args {
        if value.is_null() {
            continue;
        }
        let placeholder = format!("{{{name}}}");
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &urlencoding::encode(&display_value(value)));
        }
    }
    path
}

fn strip_prefix<'a>(template: &'a str, prefix: &str) -> &'a str {
    let bare = prefix.trim_start_matches('/');
    if bare.is_empty() {
        return template;
    }
    let rest = template
        .strip_prefix('/')
        .unwrap_or(template)
        .strip_prefix(bare);
    match rest {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => template,
    }
}

/// A registered path and the actions synthesized for it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    path: String,
    namespace: String,
    path_prefix: String,
    item: PathItem,
    disambiguation: Disambiguation,
    actions: IndexMap<String, Arc<Action>>,
}

impl Endpoint {
    /// Build an endpoint. Fails when `item` declares no recognized verb.
    pub fn new(
        path: impl Into<String>,
        item: PathItem,
        namespace: impl Into<String>,
        path_prefix: impl Into<String>,
        disambiguation: Disambiguation,
    ) -> Result<Self, RegistryError> {
        let path = path.into();
        if item.is_empty() {
            return Err(RegistryError::InvalidVerbData { path });
        }
        let mut endpoint = Self {
            path,
            namespace: namespace.into(),
            path_prefix: path_prefix.into(),
            item,
            disambiguation,
            actions: IndexMap::new(),
        };
        endpoint.build_actions();
        Ok(endpoint)
    }

    fn build_actions(&mut self) {
        self.actions = self
            .item
            .operations()
            .map(|op| {
                let name = synthesize_name(op.verb, &self.path, &self.namespace, self.disambiguation);
                let action = Action {
                    name: name.clone(),
                    verb: op.verb,
                    path: self.path.clone(),
                    path_prefix: self.path_prefix.clone(),
                    parameters: parameter_map(&op.parameters),
                    responses: op.responses.clone(),
                };
                (name, Arc::new(action))
            })
            .collect();
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn item(&self) -> &PathItem {
        &self.item
    }

    pub fn disambiguation(&self) -> Disambiguation {
        self.disambiguation
    }

    pub fn verbs(&self) -> impl Iterator<Item = Verb> + '_ {
        self.item.verbs()
    }

    /// Actions keyed by synthesized name.
    pub fn actions(&self) -> &IndexMap<String, Arc<Action>> {
        &self.actions
    }

    pub fn action_for(&self, verb: Verb) -> Option<&Arc<Action>> {
        self.actions.values().find(|a| a.verb == verb)
    }

    /// Copy of this endpoint renamed for a higher hint. Hints never
    /// decrease, so a lower `hint` returns an unchanged copy.
    pub(crate) fn escalated(&self, hint: Disambiguation) -> Endpoint {
        let mut next = self.clone();
        if hint > next.disambiguation {
            next.disambiguation = hint;
            next.build_actions();
        }
        next
    }
}
