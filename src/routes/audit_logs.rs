use crate::error::app_error::AppError;
use crate::middleware::RawQuery;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::proxy::{ProxyJson, forward};
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest};
use rocket::{State, routes};

#[rocket::get("/")]
pub async fn list_audit_logs(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials, query: RawQuery) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/organization/audit-logs").with_query(query.0).with_credentials(credentials);
    forward(upstream, request, "Unable to load audit logs").await
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_audit_logs]
}
