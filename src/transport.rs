//! Transport seam and the default reqwest-backed HTTP transport.
//!
//! Actions never talk to the network directly. They assemble a path and a
//! `RequestOptions` and hand both to whatever `Transport` the service was
//! given.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::TransportError;
use crate::spec::{display_value, Verb};

/// Shape the caller expects the response body in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Json,
    /// Raw bytes, for endpoints that stream files.
    Blob,
}

/// Everything an action sends besides the path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query string parameters.
    pub params: Map<String, Value>,
    /// Form fields, in the order they were supplied.
    pub form: Vec<(String, String)>,
    pub body: Option<Value>,
    pub response_type: ResponseType,
}

impl RequestOptions {
    /// JSON rendering used when reporting a failed request.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if !self.params.is_empty() {
            out.insert("params".into(), Value::Object(self.params.clone()));
        }
        if !self.form.is_empty() {
            let form = self
                .form
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            out.insert("formData".into(), Value::Object(form));
        }
        if let Some(body) = &self.body {
            out.insert("body".into(), body.clone());
        }
        if self.response_type == ResponseType::Blob {
            out.insert("responseType".into(), Value::String("blob".into()));
        }
        Value::Object(out)
    }
}

/// Response payload, unwrapped from the transport envelope by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Binary(Vec<u8>),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Binary(_) => None,
        }
    }
}

/// Transport envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub data: ResponseData,
}

/// Performs the HTTP call for a synthesized action.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `verb` against `path`, relative to the transport's base URL.
    async fn request(
        &self,
        verb: Verb,
        path: &str,
        options: RequestOptions,
    ) -> Result<TransportResponse, TransportError>;
}

/// `Transport` over an async reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        verb: Verb,
        path: &str,
        options: RequestOptions,
    ) -> Result<TransportResponse, TransportError> {
        let method = Method::from_bytes(verb.as_str().to_uppercase().as_bytes()).map_err(|_| {
            TransportError::UnsupportedMethod {
                method: verb.to_string(),
            }
        })?;
        let url = self.build_url(path);
        debug!(%method, %url, "sending request");

        let mut req = self.client.request(method, &url);

        let query_pairs = build_query_pairs(&options.params);
        if !query_pairs.is_empty() {
            req = req.query(&query_pairs);
        }
        if let Some(body) = &options.body {
            req = req.json(body);
        } else if !options.form.is_empty() {
            req = req.form(&options.form);
        }

        send_request(req, options.response_type).await
    }
}

fn build_query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), display_value(v)))
        .collect()
}

async fn send_request(
    req: reqwest::RequestBuilder,
    response_type: ResponseType,
) -> Result<TransportResponse, TransportError> {
    let resp = req.send().await.map_err(TransportError::RequestFailed)?;
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.map_err(TransportError::ResponseRead)?;
        return Err(TransportError::HttpStatus { status, body });
    }

    let data = match response_type {
        ResponseType::Blob => {
            let bytes = resp.bytes().await.map_err(TransportError::ResponseRead)?;
            ResponseData::Binary(bytes.to_vec())
        }
        ResponseType::Json => {
            let text = resp.text().await.map_err(TransportError::ResponseRead)?;
            let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
            ResponseData::Json(value)
        }
    };

    Ok(TransportResponse {
        status: status.as_u16(),
        data,
    })
}
