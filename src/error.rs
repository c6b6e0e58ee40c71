//! Error types for the swagger-actions crate.

use serde_json::Value;
use thiserror::Error;

/// Errors raised by a transport while performing a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("HTTP request failed")]
    RequestFailed(#[source] reqwest::Error),

    #[error("failed to read response body")]
    ResponseRead(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    /// Failure reported by a caller-provided transport.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors returned to the caller of a synthesized action.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no transport was provided to the service")]
    NoTransportProvided,

    #[error("no action named {name}")]
    UnknownAction { name: String },

    #[error("this action requires the parameters {}", .expected.join(","))]
    MissingParameters { expected: Vec<String> },

    #[error("the parameter names {} are not valid for this action", .provided.join(","))]
    InvalidParameterNames { provided: Vec<String> },

    #[error("this action requires a body parameter, only {} were given", .provided.join(","))]
    MissingBodyParameter { provided: Vec<String> },

    #[error("{} are the only permitted values for {parameter}", .allowed.join(","))]
    EnumValidation {
        parameter: String,
        allowed: Vec<String>,
    },

    #[error("request to {path} failed")]
    UpstreamRequest {
        path: String,
        payload: Value,
        #[source]
        source: TransportError,
    },
}

/// Errors raised while registering an endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error(
        "endpoint data for {path} does not have allowed verbs like \
         get,head,post,put,delete,connect,options,trace,patch"
    )]
    InvalidVerbData { path: String },
}

/// Errors returned by service initialization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InitError {
    #[error("no transport was provided to the service")]
    NoTransportProvided,

    #[error("failed to fetch API document from {path}")]
    DocumentFetch {
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("invalid API document: {reason}")]
    InvalidDocument { reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
