use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward, segment};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use reqwest::Method;
use rocket::{State, routes};
use serde_json::Value;

// Locally hyphenated, upstream uses an underscore.
const UPSTREAM_PATH: &str = "/v1/organization/admin_api_keys";

#[rocket::get("/")]
pub async fn list_api_keys(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get(UPSTREAM_PATH).with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load admin API keys").await
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_api_key(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post(UPSTREAM_PATH).with_body(payload.into_inner()).with_credentials(credentials);
    forward(upstream, request, "Unable to create admin API key").await
}

#[rocket::delete("/<key_id>")]
pub async fn delete_api_key(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, key_id: &str) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::DELETE, format!("{UPSTREAM_PATH}/{}", segment(key_id))).with_credentials(credentials);
    forward(upstream, request, "Unable to delete admin API key").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_api_keys, create_api_key, delete_api_key]
}
