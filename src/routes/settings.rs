use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use reqwest::Method;
use rocket::{State, routes};
use serde_json::Value;

#[rocket::get("/smtp")]
pub async fn get_smtp(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/settings/smtp").with_credentials(credentials);
    forward(upstream, request, "Unable to load SMTP settings").await
}

#[rocket::put("/smtp", data = "<payload>")]
pub async fn put_smtp(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::PUT, "/v1/organization/settings/smtp")
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to update SMTP settings").await
}

#[rocket::get("/workspace-quotas")]
pub async fn get_workspace_quotas(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/settings/workspace-quotas").with_credentials(credentials);
    forward(upstream, request, "Unable to load workspace quotas").await
}

#[rocket::put("/workspace-quotas", data = "<payload>")]
pub async fn put_workspace_quotas(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::PUT, "/v1/organization/settings/workspace-quotas")
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to update workspace quotas").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![get_smtp, put_smtp, get_workspace_quotas, put_workspace_quotas]
}
