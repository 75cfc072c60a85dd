use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use rocket::{State, routes};

#[rocket::get("/")]
pub async fn get_overview(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/overview").with_credentials(credentials);
    forward(upstream, request, "Unable to load organization overview").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![get_overview]
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{MockUpstream, test_client};
    use reqwest::Method;
    use rocket::http::Status;
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn unauthorized_upstream_is_relayed() {
        let upstream = MockUpstream::new();
        upstream.respond(Method::GET, "/v1/organization/overview", 401, json!({"error": "invalid token"}));
        let client = test_client(upstream).await;

        let response = client.get("/api/jan/organization/overview").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(response.into_json::<Value>().await, Some(json!({"error": "invalid token"})));
    }
}
