use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward, segment};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use reqwest::Method;
use rocket::{State, routes};
use serde_json::Value;

#[rocket::get("/")]
pub async fn list_members(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/members").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load organization members").await
}

#[rocket::patch("/<user_id>", data = "<payload>")]
pub async fn update_member(
    upstream: &State<SharedUpstream>,
    _rate_limit: RateLimit,
    credentials: UpstreamCredentials,
    user_id: &str,
    payload: JsonBody<Value>,
) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::PATCH, format!("/v1/organization/members/{}", segment(user_id)))
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to update organization member").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_members, update_member]
}
