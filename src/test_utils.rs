use crate::config::Config;
use crate::models::project::Project;
use crate::service::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};
use crate::upstream::{SharedUpstream, UpstreamApi, UpstreamError, UpstreamRequest, UpstreamResponse};
use async_trait::async_trait;
use reqwest::Method;
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ── Upstream side ─────────────────────────────────────────────────────────────

enum MockReply {
    Respond(UpstreamResponse),
    Fail,
}

/// In-memory upstream API: canned replies per `(method, path)` and a log of what was sent.
/// Unknown routes answer 404.
#[derive(Default)]
pub struct MockUpstream {
    replies: Mutex<HashMap<(Method, String), MockReply>>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl MockUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_with_cookies(method, path, status, body, &[]);
    }

    pub fn respond_with_cookies(&self, method: Method, path: &str, status: u16, body: Value, set_cookies: &[&str]) {
        let response = UpstreamResponse {
            status,
            body: Some(body),
            set_cookies: set_cookies.iter().map(|cookie| cookie.to_string()).collect(),
        };
        self.replies.lock().unwrap().insert((method, path.to_string()), MockReply::Respond(response));
    }

    /// Upstream answers with a body that is not JSON.
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) {
        let response = UpstreamResponse {
            status,
            ..UpstreamResponse::default()
        };
        self.replies.lock().unwrap().insert((method, path.to_string()), MockReply::Respond(response));
    }

    /// The connection to upstream fails for this route.
    pub fn fail(&self, method: Method, path: &str) {
        self.replies.lock().unwrap().insert((method, path.to_string()), MockReply::Fail);
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl UpstreamApi for MockUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let key = (request.method.clone(), request.path.clone());
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().get(&key) {
            Some(MockReply::Respond(response)) => Ok(response.clone()),
            Some(MockReply::Fail) => Err(UpstreamError::Unavailable("connection refused".to_string())),
            None => Ok(UpstreamResponse {
                status: 404,
                body: Some(json!({"error": "not found"})),
                set_cookies: Vec::new(),
            }),
        }
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.session.cookie_secure = false;
    config.admin.static_dir = "tests/fixtures/admin".to_string();
    config
}

pub async fn test_client(upstream: Arc<MockUpstream>) -> Client {
    test_client_with_config(test_config(), upstream).await
}

pub async fn test_client_with_config(config: Config, upstream: Arc<MockUpstream>) -> Client {
    let upstream: SharedUpstream = upstream;
    let rocket = crate::build_rocket_with_upstream(config, upstream).expect("valid rocket configuration");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

/// The `Set-Cookie` header for `name`, if the response set one.
pub fn set_cookie_header(response: &rocket::local::asynchronous::LocalResponse<'_>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get("Set-Cookie")
        .find(|value| value.starts_with(&prefix))
        .map(str::to_string)
}

// ── Client side ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeState {
    projects: Vec<Project>,
    next_id: u32,
    overrides: HashMap<(String, String), ApiResponse>,
    transport_failures: u32,
    refresh_status: Option<u16>,
    requests: Vec<ApiRequest>,
}

/// In-memory admin proxy for Resource Service tests. Keeps a small project store and answers
/// the session endpoints; any other route can be scripted with [`FakeTransport::respond`].
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<FakeState>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert((method.to_string(), path.to_string()), ApiResponse::new(status, body));
    }

    /// The next `count` calls fail before reaching the proxy.
    pub fn fail_next(&self, count: u32) {
        self.state.lock().unwrap().transport_failures = count;
    }

    pub fn set_refresh_status(&self, status: u16) {
        self.state.lock().unwrap().refresh_status = Some(status);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.method.as_str() == method && request.path == path)
            .count()
    }

    fn handle(state: &mut FakeState, request: &ApiRequest) -> ApiResponse {
        let method = request.method.as_str().to_string();
        if let Some(response) = state.overrides.get(&(method.clone(), request.path.clone())) {
            return response.clone();
        }

        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["auth", "me"]) => ApiResponse::new(200, json!({"object": "user", "id": "usr_admin", "email": "admin@example.com", "name": "Admin"})),
            ("GET", ["auth", "refresh-token"]) => match state.refresh_status.unwrap_or(200) {
                200 => ApiResponse::new(200, json!({"access_token": "tok_refreshed", "expires_in": 900})),
                status => ApiResponse::new(status, json!({"error": "Unable to refresh"})),
            },
            ("GET", ["organization", "projects"]) => {
                let include_archived = request.query_value("include_archived") == Some("true");
                let data: Vec<&Project> = state.projects.iter().filter(|project| include_archived || project.archived_at.is_none()).collect();
                ApiResponse::new(
                    200,
                    json!({
                        "object": "list",
                        "data": data,
                        "first_id": data.first().map(|project| project.id.clone()),
                        "last_id": data.last().map(|project| project.id.clone()),
                        "has_more": false
                    }),
                )
            }
            ("POST", ["organization", "projects"]) => {
                let Some(name) = request.body.as_ref().and_then(|body| body.get("name")).and_then(Value::as_str) else {
                    return ApiResponse::new(400, json!({"error": "name is required"}));
                };
                state.next_id += 1;
                let project = Project {
                    object: "project".to_string(),
                    id: format!("proj_{}", state.next_id),
                    name: name.to_string(),
                    created_at: 1_700_000_000 + i64::from(state.next_id),
                    archived_at: None,
                    status: "active".to_string(),
                };
                state.projects.push(project.clone());
                ApiResponse::new(201, json!(project))
            }
            ("POST", ["organization", "projects", id]) => {
                let name = request.body.as_ref().and_then(|body| body.get("name")).and_then(Value::as_str).map(str::to_string);
                match (state.projects.iter_mut().find(|project| project.id == *id), name) {
                    (Some(project), Some(name)) => {
                        project.name = name;
                        ApiResponse::new(200, json!(project))
                    }
                    (None, _) => ApiResponse::new(404, json!({"error": "Project not found"})),
                    (_, None) => ApiResponse::new(400, json!({"error": "name is required"})),
                }
            }
            ("POST", ["organization", "projects", id, "archive"]) => match state.projects.iter_mut().find(|project| project.id == *id) {
                Some(project) => {
                    project.archived_at = Some(1_800_000_000);
                    project.status = "archived".to_string();
                    ApiResponse::new(200, json!(project))
                }
                None => ApiResponse::new(404, json!({"error": "Project not found"})),
            },
            _ => ApiResponse::new(404, json!({"error": "Not found"})),
        }
    }
}

#[async_trait]
impl ApiTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state.transport_failures > 0 {
            state.transport_failures -= 1;
            return Err(TransportError::Unavailable("connection reset".to_string()));
        }

        Ok(Self::handle(&mut state, &request))
    }
}
