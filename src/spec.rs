//! Swagger document → internal IR (intermediate representation)
//!
//! Reads a Swagger/OpenAPI JSON document into per-path `PathItem`s keyed by
//! verb. Document order of paths and parameters is preserved.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::InitError;

/// HTTP verbs an operation may be declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Verb::Get,
        Verb::Head,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Connect,
        Verb::Options,
        Verb::Trace,
        Verb::Patch,
    ];

    /// Lowercase verb as it appears in a document and in synthesized names.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Head => "head",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Connect => "connect",
            Verb::Options => "options",
            Verb::Trace => "trace",
            Verb::Patch => "patch",
        }
    }

    /// Parse a document key. Anything that is not a verb yields `None`.
    pub fn from_key(key: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|v| v.as_str() == key)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Path,
    Query,
    Body,
    FormData,
}

impl Location {
    fn from_in(value: &str) -> Option<Location> {
        match value {
            "path" => Some(Location::Path),
            "query" => Some(Location::Query),
            "body" => Some(Location::Body),
            "formData" => Some(Location::FormData),
            _ => None,
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ParameterSpec {
    pub name: String,
    pub location: Location,
    pub required: bool,
    /// Declared `type` (or `schema.type`), if any.
    pub kind: Option<String>,
    /// Allowed values, compared case-insensitively at call time.
    pub allowed: Option<Vec<String>>,
    pub schema: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            kind: None,
            allowed: None,
            schema: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Key the parameter is addressed under in a caller's argument map.
    ///
    /// Body parameters are always addressed as `"body"`.
    pub fn key(&self) -> &str {
        match self.location {
            Location::Body => "body",
            _ => &self.name,
        }
    }
}

/// Metadata for a single declared response.
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct ResponseSpec {
    pub description: String,
    pub schema: Option<Value>,
}

impl ResponseSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            schema: None,
        }
    }
}

/// Responses keyed by status code, with every 2xx also aliased as `"ok"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMap {
    entries: IndexMap<String, ResponseSpec>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, response: ResponseSpec) {
        let code = code.into();
        let is_ok = code
            .parse::<u16>()
            .is_ok_and(|status| (200..300).contains(&status));
        if is_ok {
            self.entries.insert("ok".to_string(), response.clone());
        }
        self.entries.insert(code, response);
    }

    pub fn get(&self, code: &str) -> Option<&ResponseSpec> {
        self.entries.get(code)
    }

    /// The success response, if the operation declares one.
    pub fn ok(&self) -> Option<&ResponseSpec> {
        self.entries.get("ok")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResponseSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One verb declared on a path.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct OperationSpec {
    pub verb: Verb,
    pub summary: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterSpec>,
    pub responses: ResponseMap,
}

impl OperationSpec {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            summary: String::new(),
            parameters: Vec::new(),
            responses: ResponseMap::new(),
        }
    }

    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn response(mut self, code: &str, response: ResponseSpec) -> Self {
        self.responses.insert(code, response);
        self
    }
}

/// All operations declared for a single path template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    operations: IndexMap<Verb, OperationSpec>,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(mut self, operation: OperationSpec) -> Self {
        self.operations.insert(operation.verb, operation);
        self
    }

    /// Read a path item object. Non-verb keys are ignored; path-level
    /// `parameters` are merged into every operation.
    pub fn from_value(item: &Value) -> PathItem {
        let mut operations = IndexMap::new();
        let Some(object) = item.as_object() else {
            return PathItem { operations };
        };
        let path_level_params = object.get("parameters");

        for (key, operation) in object {
            let Some(verb) = Verb::from_key(key) else {
                continue;
            };
            operations.insert(
                verb,
                extract_single_operation(verb, operation, path_level_params),
            );
        }

        PathItem { operations }
    }

    pub fn get(&self, verb: Verb) -> Option<&OperationSpec> {
        self.operations.get(&verb)
    }

    pub fn verbs(&self) -> impl Iterator<Item = Verb> + '_ {
        self.operations.keys().copied()
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations.values()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// `info` block of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiInfo {
    pub version: String,
    pub title: String,
}

/// A parsed API document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDocument {
    pub info: ApiInfo,
    /// Path templates in document order.
    pub paths: IndexMap<String, PathItem>,
}

impl ApiDocument {
    /// Read a document from its JSON form. A missing `paths` object is an
    /// error; a missing `info` block is not.
    pub fn from_value(doc: &Value) -> Result<ApiDocument, InitError> {
        let info = doc
            .get("info")
            .map(|info| ApiInfo {
                version: str_field(info, "version"),
                title: str_field(info, "title"),
            })
            .unwrap_or_default();

        let paths = doc
            .get("paths")
            .and_then(|p| p.as_object())
            .ok_or_else(|| InitError::InvalidDocument {
                reason: "document has no paths object".to_string(),
            })?
            .iter()
            .map(|(path, item)| (path.clone(), PathItem::from_value(item)))
            .collect();

        Ok(ApiDocument { info, paths })
    }

    pub fn from_json_str(text: &str) -> Result<ApiDocument, InitError> {
        let raw: Value = serde_json::from_str(text).map_err(|e| InitError::InvalidDocument {
            reason: e.to_string(),
        })?;
        Self::from_value(&raw)
    }
}

fn extract_single_operation(
    verb: Verb,
    operation: &Value,
    path_level_params: Option<&Value>,
) -> OperationSpec {
    let summary = operation
        .get("summary")
        .or_else(|| operation.get("description"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let mut responses = ResponseMap::new();
    if let Some(declared) = operation.get("responses").and_then(|r| r.as_object()) {
        for (code, response) in declared {
            responses.insert(
                code.clone(),
                ResponseSpec {
                    description: str_field(response, "description"),
                    schema: response.get("schema").cloned(),
                },
            );
        }
    }

    OperationSpec {
        verb,
        summary,
        parameters: collect_params(path_level_params, operation.get("parameters")),
        responses,
    }
}

/// Merge path-level + operation-level parameters.
/// Operation-level overrides path-level for the same name and location.
fn collect_params(
    path_level: Option<&Value>,
    operation_level: Option<&Value>,
) -> Vec<ParameterSpec> {
    let mut param_map: IndexMap<(String, Location), ParameterSpec> = IndexMap::new();

    for source in [path_level, operation_level].iter().flatten() {
        if let Some(params) = source.as_array() {
            for param in params {
                if let Some(p) = parse_param(param) {
                    param_map.insert((p.name.clone(), p.location), p);
                }
            }
        }
    }

    param_map.into_values().collect()
}

/// Parse a single parameter. Header and cookie parameters are skipped.
fn parse_param(param: &Value) -> Option<ParameterSpec> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = Location::from_in(param.get("in")?.as_str()?)?;
    let required = param
        .get("required")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let schema = param.get("schema").cloned();
    let kind = param
        .get("type")
        .or_else(|| schema.as_ref().and_then(|s| s.get("type")))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let allowed = param
        .get("enum")
        .or_else(|| schema.as_ref().and_then(|s| s.get("enum")))
        .and_then(|v| v.as_array())
        .map(|values| values.iter().map(display_value).collect());

    Some(ParameterSpec {
        name,
        location,
        required,
        kind,
        allowed,
        schema,
    })
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Render a JSON scalar the way it appears in a URL or form field.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
