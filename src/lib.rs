//! Synthesize a callable client surface from a Swagger/OpenAPI document.
//!
//! Every (path, verb) pair of the document becomes an action with a
//! deterministic, human-readable name (`getRegionalAddressList`). Paths
//! whose names would collide fold extra trailing segments into their
//! names until every action is unique.
//!
//! # Usage
//!
//! ```no_run
//! use swagger_actions::{Service, ServiceConfig};
//! use serde_json::{json, Map, Value};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::new("api.place.com:5000")
//!     .swagger_path("/Tools")
//!     .namespace("rest");
//! let mut service = Service::http(config)?;
//! service.init().await?;
//!
//! let mut args = Map::new();
//! args.insert("region".into(), json!("EMEA"));
//! let data = service.call("getRegionalArticle", &args).await?;
//! # Ok(())
//! # }
//! ```

pub mod collision;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod naming;
pub mod params;
pub mod service;
pub mod spec;
pub mod transport;

pub use collision::{escalation_depth, find_colliding_indices, required_escalation};
pub use config::ServiceConfig;
pub use endpoint::{request_path, Action, Endpoint};
pub use error::{ActionError, InitError, RegistryError, TransportError};
pub use naming::{synthesize_name, Disambiguation};
pub use params::{classify, ParameterMap};
pub use service::{EndpointSource, Registration, RegistrationStatus, Service};
pub use spec::{
    ApiDocument, ApiInfo, Location, OperationSpec, ParameterSpec, PathItem, ResponseMap,
    ResponseSpec, Verb,
};
pub use transport::{
    HttpTransport, RequestOptions, ResponseData, ResponseType, Transport, TransportResponse,
};

// Re-export dependencies for downstream crates
pub use async_trait::async_trait;
pub use reqwest;
