use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward, segment};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use rocket::{State, routes};
use serde_json::Value;

#[rocket::get("/")]
pub async fn list_projects(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/projects").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load organization projects").await
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_project(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post("/v1/organization/projects")
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to create project").await
}

#[rocket::post("/<id>", data = "<payload>")]
pub async fn rename_project(
    upstream: &State<SharedUpstream>,
    _rate_limit: RateLimit,
    credentials: UpstreamCredentials,
    id: &str,
    payload: JsonBody<Value>,
) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post(format!("/v1/organization/projects/{}", segment(id)))
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to update project").await
}

#[rocket::post("/<id>/archive")]
pub async fn archive_project(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, id: &str) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post(format!("/v1/organization/projects/{}/archive", segment(id))).with_credentials(credentials);
    forward(upstream, request, "Unable to archive project").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_projects, create_project, rename_project, archive_project]
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{MockUpstream, test_client};
    use reqwest::Method;
    use rocket::http::{ContentType, Cookie, Status};
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn list_forwards_query_and_credentials() {
        let upstream = MockUpstream::new();
        let list = json!({"object": "list", "data": [], "has_more": false});
        upstream.respond(Method::GET, "/v1/organization/projects", 200, list.clone());
        let client = test_client(upstream.clone()).await;

        let response = client
            .get("/api/jan/organization/projects?include_archived=true")
            .cookie(Cookie::new("jan_admin_access_token", "tok_abc"))
            .cookie(Cookie::new("jan_refresh", "r1"))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_json::<Value>().await, Some(list));

        let sent = upstream.last_request().expect("upstream call");
        assert_eq!(sent.query.as_deref(), Some("include_archived=true"));
        assert_eq!(sent.credentials.access_token.as_deref(), Some("tok_abc"));
        let cookie_header = sent.credentials.cookie_header.expect("cookie header");
        assert!(cookie_header.contains("jan_refresh=r1"));
        assert!(cookie_header.contains("jan_admin_access_token=tok_abc"));
    }

    #[rocket::async_test]
    async fn upstream_status_and_body_are_relayed() {
        let upstream = MockUpstream::new();
        upstream.respond(Method::POST, "/v1/organization/projects", 409, json!({"error": "Project already exists"}));
        let client = test_client(upstream.clone()).await;

        let response = client
            .post("/api/jan/organization/projects")
            .header(ContentType::JSON)
            .body(r#"{"name":"Research"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Conflict);
        assert_eq!(response.into_json::<Value>().await, Some(json!({"error": "Project already exists"})));
        assert_eq!(upstream.last_request().and_then(|r| r.body), Some(json!({"name": "Research"})));
    }

    #[rocket::async_test]
    async fn non_json_upstream_body_becomes_null() {
        let upstream = MockUpstream::new();
        upstream.respond_empty(Method::POST, "/v1/organization/projects/proj_1/archive", 204);
        let client = test_client(upstream).await;

        let response = client.post("/api/jan/organization/projects/proj_1/archive").dispatch().await;
        assert_eq!(response.status(), Status::NoContent);
    }

    #[rocket::async_test]
    async fn rename_targets_project_path() {
        let upstream = MockUpstream::new();
        upstream.respond(Method::POST, "/v1/organization/projects/proj_1", 200, json!({"object": "project", "id": "proj_1"}));
        let client = test_client(upstream.clone()).await;

        let response = client
            .post("/api/jan/organization/projects/proj_1")
            .header(ContentType::JSON)
            .body(r#"{"name":"Renamed"}"#)
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(upstream.last_request().map(|r| r.path), Some("/v1/organization/projects/proj_1".to_string()));
    }

    #[rocket::async_test]
    async fn transport_failure_uses_resource_message() {
        let upstream = MockUpstream::new();
        upstream.fail(Method::GET, "/v1/organization/projects");
        let client = test_client(upstream).await;

        let response = client.get("/api/jan/organization/projects").dispatch().await;
        assert_eq!(response.status(), Status::InternalServerError);
        assert_eq!(response.into_json::<Value>().await, Some(json!({"error": "Unable to load organization projects"})));
    }

    #[rocket::async_test]
    async fn invalid_json_body_is_rejected_locally() {
        let upstream = MockUpstream::new();
        let client = test_client(upstream.clone()).await;

        let response = client
            .post("/api/jan/organization/projects")
            .header(ContentType::JSON)
            .body("{")
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(response.into_json::<Value>().await, Some(json!({"error": "Invalid payload"})));
        assert!(upstream.requests().is_empty());
    }
}
