use crate::error::app_error::AppError;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use rocket::{State, routes};

#[rocket::get("/activity")]
pub async fn list_activity(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/mcp/activity").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load MCP activity").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_activity]
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{MockUpstream, test_client};
    use reqwest::Method;
    use rocket::http::Status;
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn activity_failure_message() {
        let upstream = MockUpstream::new();
        upstream.fail(Method::GET, "/v1/mcp/activity");
        let client = test_client(upstream).await;

        let response = client.get("/api/jan/mcp/activity").dispatch().await;
        assert_eq!(response.status(), Status::InternalServerError);
        assert_eq!(response.into_json::<Value>().await, Some(json!({"error": "Unable to load MCP activity"})));
    }
}
