//! Endpoint registry.
//!
//! The `Service` owns every registered endpoint and an incrementally
//! maintained index from synthesized action name to action. Registration
//! takes `&mut self`, so there is a single writer; once initialization is
//! done the service can be shared and actions invoked concurrently.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::collision::{
    escalation_depth, find_colliding_indices, leaf_group, required_escalation,
};
use crate::config::ServiceConfig;
use crate::endpoint::{Action, Endpoint};
use crate::error::{ActionError, InitError, RegistryError};
use crate::naming::Disambiguation;
use crate::spec::{ApiDocument, ApiInfo, PathItem, Verb};
use crate::transport::{HttpTransport, RequestOptions, ResponseData, Transport};

/// What to register: a path definition from a document, or an endpoint
/// that was already built.
#[derive(Debug, Clone)]
pub enum EndpointSource {
    Definition { path: String, item: PathItem },
    Built(Endpoint),
}

impl EndpointSource {
    pub fn definition(path: impl Into<String>, item: PathItem) -> Self {
        Self::Definition {
            path: path.into(),
            item,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Definition { path, .. } => path,
            Self::Built(endpoint) => endpoint.path(),
        }
    }
}

impl From<Endpoint> for EndpointSource {
    fn from(endpoint: Endpoint) -> Self {
        Self::Built(endpoint)
    }
}

/// Outcome of a `Service::register` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// A new path was added.
    Added,
    /// The path was already registered and its data was replaced.
    Replaced,
    /// Some synthesized names already belong to another path; nothing
    /// was registered.
    Rejected { conflicts: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub endpoint: Endpoint,
    pub status: RegistrationStatus,
}

/// Registry of endpoints synthesized from an API document.
pub struct Service {
    config: ServiceConfig,
    transport: Option<Arc<dyn Transport>>,
    info: ApiInfo,
    endpoints: Vec<Endpoint>,
    positions: HashMap<String, usize>,
    actions: IndexMap<String, Arc<Action>>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .field("has_transport", &self.transport.is_some())
            .field("info", &self.info)
            .field("endpoints", &self.endpoints.len())
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl Service {
    /// A service without a transport. Endpoints can be registered and
    /// inspected, but actions cannot be invoked.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            transport: None,
            info: ApiInfo::default(),
            endpoints: Vec::new(),
            positions: HashMap::new(),
            actions: IndexMap::new(),
        }
    }

    /// A service dispatching over HTTP to the configured base URL.
    pub fn http(config: ServiceConfig) -> Result<Self, url::ParseError> {
        let base_url = config.base_url()?;
        let transport = HttpTransport::new(base_url.as_str());
        Ok(Self::new(config).with_transport(Arc::new(transport)))
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Version and title of the loaded document.
    pub fn info(&self) -> &ApiInfo {
        &self.info
    }

    /// Registered endpoints in registration order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn endpoint(&self, path: &str) -> Option<&Endpoint> {
        self.positions.get(path).map(|&i| &self.endpoints[i])
    }

    pub fn endpoint_paths(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(Endpoint::path)
    }

    /// Every published action keyed by synthesized name.
    pub fn actions(&self) -> &IndexMap<String, Arc<Action>> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&Arc<Action>> {
        self.actions.get(name)
    }

    /// Invoke the action published under `name`.
    pub async fn call(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<ResponseData, ActionError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction {
                name: name.to_string(),
            })?;
        let transport = self
            .transport
            .as_deref()
            .ok_or(ActionError::NoTransportProvided)?;
        action.invoke(transport, args).await
    }

    /// Register one path.
    ///
    /// With `hint` set the endpoint is named with exactly that hint (or
    /// higher, if the path was already registered with a higher one).
    /// Without it, collisions with registered paths are detected: this
    /// endpoint gets the escalation its leaf group needs and earlier
    /// members of the group are escalated and renamed to match.
    ///
    /// A registration whose names already belong to another path is
    /// rejected as a whole; the earlier registration keeps the name.
    pub fn register(
        &mut self,
        source: EndpointSource,
        hint: Option<Disambiguation>,
    ) -> Result<Registration, RegistryError> {
        let endpoint = match source {
            EndpointSource::Definition { path, item } => Endpoint::new(
                path,
                item,
                self.config.namespace.clone(),
                self.config.path_prefix(),
                Disambiguation::None,
            )?,
            EndpointSource::Built(endpoint) => endpoint,
        };
        let path = endpoint.path().to_string();
        let existing = self.positions.get(&path).copied();

        let mut hint = match hint {
            Some(hint) => hint,
            None => self.resolve_collisions(&path),
        };
        if let Some(i) = existing {
            hint = hint.max(self.endpoints[i].disambiguation());
        }
        let endpoint = endpoint.escalated(hint);

        let conflicts = self.conflicting_names(&endpoint);
        if !conflicts.is_empty() {
            warn!(%path, ?conflicts, "rejecting endpoint, action names already registered");
            return Ok(Registration {
                endpoint,
                status: RegistrationStatus::Rejected { conflicts },
            });
        }

        let status = match existing {
            Some(i) => {
                self.unpublish(i);
                self.endpoints[i] = endpoint.clone();
                RegistrationStatus::Replaced
            }
            None => {
                self.positions.insert(path.clone(), self.endpoints.len());
                self.endpoints.push(endpoint.clone());
                RegistrationStatus::Added
            }
        };
        self.publish(&endpoint);
        debug!(%path, ?hint, ?status, actions = endpoint.actions().len(), "registered endpoint");

        Ok(Registration { endpoint, status })
    }

    /// Hint `path` needs among the registered paths; escalates the earlier
    /// members of its collision group as a side effect.
    fn resolve_collisions(&mut self, path: &str) -> Disambiguation {
        let mut paths: Vec<String> = self.endpoint_paths().map(str::to_string).collect();
        if !self.positions.contains_key(path) {
            paths.push(path.to_string());
        }

        let colliding = find_colliding_indices(&paths);
        let Some(position) = paths.iter().position(|p| p == path) else {
            return Disambiguation::None;
        };
        if !colliding.contains(&position) {
            return Disambiguation::None;
        }

        let group = leaf_group(&paths, path);
        let group_paths: Vec<&str> = group.iter().map(|&i| paths[i].as_str()).collect();
        let depth = escalation_depth(&group_paths);
        // a colliding path always folds in at least one segment
        let hint = Disambiguation::Escalate(required_escalation(path, depth).max(1));
        debug!(%path, ?group_paths, depth, ?hint, "resolved name collision");

        for i in group {
            if i < self.endpoints.len() && paths[i] != path {
                self.escalate(i, hint);
            }
        }
        hint
    }

    /// Raise the hint of a registered endpoint and republish its actions.
    /// Abandoned when a renamed action would take a name owned by another
    /// path.
    fn escalate(&mut self, i: usize, hint: Disambiguation) {
        let current = &self.endpoints[i];
        if hint <= current.disambiguation() {
            return;
        }
        let next = current.escalated(hint);
        let conflicts = self.conflicting_names(&next);
        if !conflicts.is_empty() {
            warn!(
                path = %current.path(),
                ?conflicts,
                "keeping existing action names, escalation would clash"
            );
            return;
        }

        info!(
            path = %current.path(),
            from = ?current.disambiguation(),
            to = ?hint,
            "renaming actions of colliding endpoint"
        );
        self.unpublish(i);
        self.publish(&next);
        self.endpoints[i] = next;
    }

    /// Names of `endpoint`'s actions already owned by a different path.
    fn conflicting_names(&self, endpoint: &Endpoint) -> Vec<String> {
        endpoint
            .actions()
            .keys()
            .filter(|name| {
                self.actions
                    .get(*name)
                    .is_some_and(|owner| owner.path() != endpoint.path())
            })
            .cloned()
            .collect()
    }

    fn unpublish(&mut self, i: usize) {
        for name in self.endpoints[i].actions().keys() {
            self.actions.shift_remove(name);
        }
    }

    fn publish(&mut self, endpoint: &Endpoint) {
        for (name, action) in endpoint.actions() {
            self.actions.insert(name.clone(), Arc::clone(action));
        }
    }

    /// Register every path of `doc` in document order.
    ///
    /// Paths whose leaf segment is shared with another path of the document
    /// are registered with `Escalate(1)`, all others with no escalation.
    pub fn load_document(&mut self, doc: &ApiDocument) -> Result<(), InitError> {
        self.info = doc.info.clone();

        let paths: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
        let colliding = find_colliding_indices(&paths);

        for (i, (path, item)) in doc.paths.iter().enumerate() {
            let hint = if colliding.contains(&i) {
                Disambiguation::Escalate(1)
            } else {
                Disambiguation::None
            };
            self.register(EndpointSource::definition(path.clone(), item.clone()), Some(hint))?;
        }

        info!(
            title = %self.info.title,
            version = %self.info.version,
            endpoints = self.endpoints.len(),
            actions = self.actions.len(),
            "loaded API document"
        );
        Ok(())
    }

    /// Fetch and parse `swagger.json` through the transport.
    pub async fn fetch_document(&self) -> Result<ApiDocument, InitError> {
        let transport = self
            .transport
            .as_deref()
            .ok_or(InitError::NoTransportProvided)?;
        let path = self.config.document_path();
        debug!(%path, "fetching API document");

        let response = transport
            .request(Verb::Get, &path, RequestOptions::default())
            .await
            .map_err(|source| InitError::DocumentFetch {
                path: path.clone(),
                source,
            })?;
        match response.data {
            ResponseData::Json(value) => ApiDocument::from_value(&value),
            ResponseData::Binary(_) => Err(InitError::InvalidDocument {
                reason: format!("{path} did not return JSON"),
            }),
        }
    }

    /// Fetch the API document and register all of its paths.
    pub async fn init(&mut self) -> Result<(), InitError> {
        let doc = self.fetch_document().await?;
        self.load_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::spec::{Location, OperationSpec, ParameterSpec, ResponseSpec};
    use crate::transport::mock::RecordingTransport;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn get_item() -> PathItem {
        PathItem::new()
            .operation(OperationSpec::new(Verb::Get).response("200", ResponseSpec::new("Success")))
    }

    fn post_item() -> PathItem {
        PathItem::new().operation(
            OperationSpec::new(Verb::Post)
                .parameter(ParameterSpec::new("model", Location::Body).required(true))
                .response("200", ResponseSpec::new("Success")),
        )
    }

    fn service(namespace: &str) -> Service {
        Service::new(ServiceConfig::new("api.place.com").namespace(namespace))
    }

    fn names(service: &Service) -> BTreeSet<String> {
        service.actions().keys().cloned().collect()
    }

    const DISPLAY_DATA: &str = "/rest/commonApis/{region}/facilities/{facility}/getDisplayData";
    const SUB_DISPLAY_DATA: &str =
        "/rest/commonApis/{region}/facilities/{facility}/subdepartments/{subDepartment}/getDisplayData";

    #[test]
    fn manual_registration_publishes_action() {
        let mut service = Service::new(ServiceConfig::default().namespace("cache").base_path(""));
        let reg = service
            .register(EndpointSource::definition("/cache/access/user", get_item()), None)
            .unwrap();

        assert_eq!(reg.status, RegistrationStatus::Added);
        assert!(service.action("getAccessUser").is_some());
        assert_eq!(service.endpoints().len(), 1);
        assert_eq!(
            service.endpoint_paths().collect::<Vec<_>>(),
            ["/cache/access/user"]
        );
    }

    #[test]
    fn forced_hint_controls_name_length() {
        let path = "/rest/external/{region}/article/{locationType}/list";

        let mut one = service("external");
        let reg = one
            .register(
                EndpointSource::definition(path, get_item()),
                Some(Disambiguation::Escalate(1)),
            )
            .unwrap();
        assert!(reg.endpoint.actions().contains_key("getRegionLocationTypeList"));

        let mut two = service("external");
        let reg = two
            .register(
                EndpointSource::definition(path, get_item()),
                Some(Disambiguation::Escalate(2)),
            )
            .unwrap();
        assert!(reg
            .endpoint
            .actions()
            .contains_key("getRegionArticleLocationTypeList"));
    }

    #[test]
    fn registering_same_path_twice_does_not_duplicate() {
        let path = "/rest/external/{region}/article/{locationType}/list";
        let mut service = service("external");
        let hint = Some(Disambiguation::Escalate(2));

        service
            .register(EndpointSource::definition(path, get_item()), hint)
            .unwrap();
        let reg = service
            .register(EndpointSource::definition(path, get_item()), hint)
            .unwrap();

        assert_eq!(reg.status, RegistrationStatus::Replaced);
        assert_eq!(service.actions().len(), 1);
        assert_eq!(service.endpoints().len(), 1);
    }

    #[test]
    fn replacing_a_path_updates_its_verbs() {
        let mut service = service("rest");
        service
            .register(EndpointSource::definition("/rest/user/profile", get_item()), None)
            .unwrap();
        service
            .register(EndpointSource::definition("/rest/user/profile", post_item()), None)
            .unwrap();

        assert_eq!(
            names(&service),
            BTreeSet::from(["postUserProfile".to_string()])
        );
    }

    #[test]
    fn later_colliding_endpoint_gets_longer_name() {
        let mut service = service("commonApis");
        service
            .register(EndpointSource::definition(DISPLAY_DATA, get_item()), None)
            .unwrap();
        let reg = service
            .register(EndpointSource::definition(SUB_DISPLAY_DATA, get_item()), None)
            .unwrap();

        assert!(reg
            .endpoint
            .actions()
            .contains_key("getRegionSubDepartmentDisplayData"));
    }

    #[test]
    fn earlier_colliding_endpoint_is_renamed() {
        let mut service = service("commonApis");
        let first = service
            .register(EndpointSource::definition(DISPLAY_DATA, get_item()), None)
            .unwrap();
        assert!(first.endpoint.actions().contains_key("getRegionDisplayData"));

        service
            .register(EndpointSource::definition(SUB_DISPLAY_DATA, get_item()), None)
            .unwrap();

        let renamed = service.endpoint(DISPLAY_DATA).unwrap();
        assert!(renamed.actions().contains_key("getRegionFacilityDisplayData"));
        assert_eq!(
            names(&service),
            BTreeSet::from([
                "getRegionFacilityDisplayData".to_string(),
                "getRegionSubDepartmentDisplayData".to_string(),
            ])
        );
    }

    #[test]
    fn collision_names_do_not_depend_on_registration_order() {
        let mut forward = service("commonApis");
        forward
            .register(EndpointSource::definition(DISPLAY_DATA, get_item()), None)
            .unwrap();
        forward
            .register(EndpointSource::definition(SUB_DISPLAY_DATA, get_item()), None)
            .unwrap();

        let mut backward = service("commonApis");
        backward
            .register(EndpointSource::definition(SUB_DISPLAY_DATA, get_item()), None)
            .unwrap();
        backward
            .register(EndpointSource::definition(DISPLAY_DATA, get_item()), None)
            .unwrap();

        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn three_way_collision_escalates_whole_group() {
        let mut service = service("external");
        for segment in ["article", "faq", "form"] {
            let path = format!("/rest/external/{{region}}/{segment}/{{locationType}}/list");
            service
                .register(EndpointSource::definition(path, get_item()), None)
                .unwrap();
        }

        assert_eq!(
            names(&service),
            BTreeSet::from([
                "getRegionArticleLocationTypeList".to_string(),
                "getRegionFaqLocationTypeList".to_string(),
                "getRegionFormLocationTypeList".to_string(),
            ])
        );
        assert!(service
            .endpoints()
            .iter()
            .all(|e| e.disambiguation() == Disambiguation::Escalate(2)));
    }

    #[test]
    fn name_clash_rejects_later_registration() {
        let mut service = service("rest");
        let none = Some(Disambiguation::None);
        service
            .register(EndpointSource::definition("/rest/a/x", get_item()), none)
            .unwrap();
        let reg = service
            .register(EndpointSource::definition("/rest/a/{x}", get_item()), none)
            .unwrap();

        assert_eq!(
            reg.status,
            RegistrationStatus::Rejected {
                conflicts: vec!["getAX".to_string()]
            }
        );
        assert_eq!(service.endpoints().len(), 1);
        assert!(service.endpoint("/rest/a/{x}").is_none());
        assert_eq!(service.action("getAX").unwrap().path(), "/rest/a/x");
    }

    #[test]
    fn escalation_that_would_clash_is_abandoned() {
        let mut service = service("rest");
        service
            .register(EndpointSource::definition("/rest/svc/foo/list", get_item()), None)
            .unwrap();
        service
            .register(EndpointSource::definition("/rest/svc/fooList", get_item()), None)
            .unwrap();
        let reg = service
            .register(EndpointSource::definition("/rest/svc/bar/list", get_item()), None)
            .unwrap();

        assert_eq!(reg.status, RegistrationStatus::Added);
        assert_eq!(
            service.endpoint("/rest/svc/foo/list").unwrap().disambiguation(),
            Disambiguation::None
        );
        assert_eq!(
            names(&service),
            BTreeSet::from([
                "getSvcList".to_string(),
                "getSvcFooList".to_string(),
                "getSvcBarList".to_string(),
            ])
        );
        assert_eq!(service.action("getSvcFooList").unwrap().path(), "/rest/svc/fooList");
    }

    #[test]
    fn built_endpoint_can_be_registered() {
        let endpoint = Endpoint::new(
            "/rest/regional/addressList",
            get_item(),
            "rest",
            "/rest",
            Disambiguation::None,
        )
        .unwrap();
        let mut service = service("rest");
        let reg = service.register(endpoint.into(), None).unwrap();

        assert_eq!(reg.status, RegistrationStatus::Added);
        assert!(service.action("getRegionalAddressList").is_some());
    }

    #[test]
    fn definition_without_verbs_is_an_error() {
        let mut service = service("rest");
        let err = service
            .register(EndpointSource::definition("/rest/nothing", PathItem::new()), None)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidVerbData { .. }));
        assert!(service.endpoints().is_empty());
    }

    fn buildings_document() -> ApiDocument {
        ApiDocument::from_value(&json!({
            "swagger": "2.0",
            "info": { "version": "2.1.0", "title": "Buildings" },
            "paths": {
                "/rest/buildings/facility/create": { "post": { "responses": { "200": { "description": "OK" } } } },
                "/rest/buildings/provider/create": { "post": { "responses": { "200": { "description": "OK" } } } },
                "/rest/buildings/localMarketArea/create": { "post": { "responses": { "200": { "description": "OK" } } } },
                "/rest/buildings/medicalCenter/create": { "post": { "responses": { "200": { "description": "OK" } } } },
                "/rest/buildings/provider/terminate": { "post": { "responses": { "200": { "description": "OK" } } } },
                "/rest/buildings/{region}/facilities": {
                    "get": {
                        "parameters": [
                            { "name": "region", "in": "path", "required": true, "type": "string", "enum": ["EMEA", "APAC"] }
                        ],
                        "responses": { "200": { "description": "OK" } }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn load_document_registers_every_path() {
        let mut service = service("buildings");
        service.load_document(&buildings_document()).unwrap();

        assert_eq!(service.info().title, "Buildings");
        assert_eq!(service.info().version, "2.1.0");
        assert_eq!(service.endpoints().len(), 6);
        for name in [
            "postFacilityCreate",
            "postProviderCreate",
            "postLocalMarketAreaCreate",
            "postMedicalCenterCreate",
            "postProviderTerminate",
            "getRegionFacilities",
        ] {
            assert!(service.action(name).is_some(), "missing {name}");
        }
        assert_eq!(
            service
                .endpoint("/rest/buildings/facility/create")
                .unwrap()
                .disambiguation(),
            Disambiguation::Escalate(1)
        );
        assert_eq!(
            service
                .endpoint("/rest/buildings/provider/terminate")
                .unwrap()
                .disambiguation(),
            Disambiguation::None
        );
    }

    #[test]
    fn load_document_is_idempotent() {
        let doc = buildings_document();
        let mut service = service("buildings");
        service.load_document(&doc).unwrap();
        let first = names(&service);

        service.load_document(&doc).unwrap();
        assert_eq!(names(&service), first);
        assert_eq!(service.endpoints().len(), 6);

        let mut fresh = self::service("buildings");
        fresh.load_document(&doc).unwrap();
        assert_eq!(names(&fresh), first);
    }

    #[tokio::test]
    async fn call_without_transport_fails() {
        let mut service = service("buildings");
        service.load_document(&buildings_document()).unwrap();

        let err = service
            .call("getRegionFacilities", &args(json!({ "region": "EMEA" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::NoTransportProvided));
    }

    #[tokio::test]
    async fn call_unknown_action_fails() {
        let service = service("buildings").with_transport(Arc::new(RecordingTransport::default()));
        let err = service.call("getNothing", &Map::new()).await.unwrap_err();
        assert!(matches!(err, ActionError::UnknownAction { name } if name == "getNothing"));
    }

    #[tokio::test]
    async fn call_dispatches_through_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let mut service = service("buildings").with_transport(transport.clone());
        service.load_document(&buildings_document()).unwrap();

        let data = service
            .call("getRegionFacilities", &args(json!({ "region": "apac" })))
            .await
            .unwrap();
        assert_eq!(
            data.as_json(),
            Some(&json!({ "path": "/buildings/apac/facilities" }))
        );

        let err = service
            .call("getRegionFacilities", &args(json!({ "region": "LATAM" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::EnumValidation { .. }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn fetch_document_without_transport_fails() {
        let service = service("rest");
        let err = service.fetch_document().await.unwrap_err();
        assert!(matches!(err, InitError::NoTransportProvided));
    }

    #[tokio::test]
    async fn init_loads_remote_document_and_calls_actions() {
        let mut server = mockito::Server::new_async().await;
        let doc_mock = server
            .mock("GET", "/rest/Tools/swagger.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "swagger": "2.0",
                    "info": { "version": "1.0", "title": "Tools" },
                    "paths": {
                        "/rest/regional/addressList": {
                            "get": { "responses": { "200": { "description": "OK" } } }
                        },
                        "/rest/commonApis/user/createOrUpdate": {
                            "post": {
                                "parameters": [
                                    { "name": "model", "in": "body", "required": true, "schema": { "type": "object" } }
                                ],
                                "responses": { "200": { "description": "OK" } }
                            }
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        let list_mock = server
            .mock("GET", "/rest/regional/addressList")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1}]"#)
            .create_async()
            .await;
        let create_mock = server
            .mock("POST", "/rest/commonApis/user/createOrUpdate")
            .match_body(mockito::Matcher::Json(json!({ "Name": "D459062" })))
            .with_status(200)
            .with_body(r#"{"Uri":"/users/D459062"}"#)
            .create_async()
            .await;

        let config = ServiceConfig::new(server.host_with_port());
        let mut service = Service::http(config).unwrap();
        service.init().await.unwrap();
        doc_mock.assert_async().await;

        assert_eq!(service.info().title, "Tools");
        let data = service
            .call("getRegionalAddressList", &Map::new())
            .await
            .unwrap();
        assert_eq!(data.as_json(), Some(&json!([{ "id": 1 }])));
        list_mock.assert_async().await;

        let data = service
            .call(
                "postCommonApisCreateOrUpdate",
                &args(json!({ "body": { "Name": "D459062" } })),
            )
            .await
            .unwrap();
        assert_eq!(data.as_json(), Some(&json!({ "Uri": "/users/D459062" })));
        create_mock.assert_async().await;
    }

    #[tokio::test]
    async fn init_reports_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/Tools/swagger.json")
            .with_status(503)
            .create_async()
            .await;

        let mut service = Service::http(ServiceConfig::new(server.host_with_port())).unwrap();
        let err = service.init().await.unwrap_err();
        assert!(matches!(err, InitError::DocumentFetch { ref path, .. } if path == "/Tools/swagger.json"));
        assert!(service.endpoints().is_empty());
    }
}
