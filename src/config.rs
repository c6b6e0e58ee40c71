//! Service configuration: where the API lives and how names are derived.

use url::Url;

pub const DEFAULT_HOST: &str = "localhost:5000";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_BASE_PATH: &str = "rest";
pub const DEFAULT_SWAGGER_PATH: &str = "/Tools";
pub const DEFAULT_NAMESPACE: &str = "rest";

/// Configuration for a `Service`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ServiceConfig {
    /// Host and optional port (e.g. "api.place.com:5000")
    pub host: String,
    /// "http" or "https"
    pub scheme: String,
    /// Path on top of the host that every endpoint lives under (e.g. "rest").
    /// It is removed from path templates before dispatch.
    pub base_path: String,
    /// Location of `swagger.json`, relative to the base URL
    pub swagger_path: String,
    /// Path segment excluded from synthesized action names
    pub namespace: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            swagger_path: DEFAULT_SWAGGER_PATH.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_matches('/').to_string();
        self
    }

    /// Set the swagger path. A leading `/` is added when missing.
    pub fn swagger_path(mut self, swagger_path: impl Into<String>) -> Self {
        self.swagger_path = normalize_swagger_path(&swagger_path.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// `scheme://host/base_path`
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}://{}/{}", self.scheme, self.host, self.base_path))
    }

    /// Replace scheme, host and base path at once.
    ///
    /// Accepts a full URL (`https://api.place.com/cache/`) or a bare host
    /// (`api.place.com`); a bare host keeps the current scheme and base path.
    pub fn set_base_url(&mut self, url_or_host: &str) {
        match Url::parse(url_or_host) {
            Ok(url) if url.has_host() => {
                self.scheme = url.scheme().to_string();
                self.host = match (url.host_str(), url.port()) {
                    (Some(host), Some(port)) => format!("{host}:{port}"),
                    (Some(host), None) => host.to_string(),
                    (None, _) => String::new(),
                };
                self.base_path = url.path().replace('/', "");
            }
            _ => self.host = url_or_host.to_string(),
        }
    }

    /// Path of the API document relative to the base URL.
    pub fn document_path(&self) -> String {
        format!("{}/swagger.json", normalize_swagger_path(&self.swagger_path))
    }

    /// Leading part of path templates removed before dispatch (`/rest`).
    pub fn path_prefix(&self) -> String {
        if self.base_path.is_empty() {
            String::new()
        } else {
            format!("/{}", self.base_path)
        }
    }
}

fn normalize_swagger_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
