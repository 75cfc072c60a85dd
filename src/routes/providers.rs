use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward, segment};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use reqwest::Method;
use rocket::{State, routes};
use serde_json::Value;

/// `GET /models/providers`: the provider catalog.
#[rocket::get("/")]
pub async fn list_providers(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/models/providers").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load providers").await
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_provider(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, payload: JsonBody<Value>) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post("/v1/organization/models/providers")
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to create provider").await
}

#[rocket::patch("/<id>", data = "<payload>")]
pub async fn update_provider(
    upstream: &State<SharedUpstream>,
    _rate_limit: RateLimit,
    credentials: UpstreamCredentials,
    id: &str,
    payload: JsonBody<Value>,
) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::new(Method::PATCH, format!("/v1/organization/models/providers/{}", segment(id)))
        .with_body(payload.into_inner())
        .with_credentials(credentials);
    forward(upstream, request, "Unable to update provider").await
}

#[rocket::post("/<id>/sync")]
pub async fn sync_provider(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, id: &str) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::post(format!("/v1/organization/models/providers/{}/sync", segment(id))).with_credentials(credentials);
    forward(upstream, request, "Unable to sync provider models").await
}

#[rocket::get("/vendors")]
pub async fn list_vendors(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/providers/vendors").with_credentials(credentials);
    forward(upstream, request, "Unable to load provider vendors").await
}

pub fn catalog_routes() -> Vec<rocket::Route> {
    routes![list_providers]
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_provider, update_provider, sync_provider]
}

pub fn vendor_routes() -> Vec<rocket::Route> {
    routes![list_vendors]
}
