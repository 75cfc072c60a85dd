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
pub async fn list_invites(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/invites").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load invites").await
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_invite(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post("/v1/organization/invites")
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to create invite").await
}

#[rocket::delete("/<id>")]
pub async fn delete_invite(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, id: &str) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::DELETE, format!("/v1/organization/invites/{}", segment(id))).with_credentials(credentials);
    forward(upstream, request, "Unable to delete invite").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_invites, create_invite, delete_invite]
}
