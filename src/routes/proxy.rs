use crate::cookies::UpstreamCookies;
use crate::error::app_error::AppError;
use crate::models::error::ErrorBody;
use crate::upstream::{SharedUpstream, UpstreamRequest, UpstreamResponse};
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response};
use serde_json::Value;

/// A JSON body with an arbitrary status, plus any upstream cookies to relay.
#[derive(Debug)]
pub struct ProxyJson {
    pub status: Status,
    pub body: Value,
    cookies: UpstreamCookies,
}

impl ProxyJson {
    pub fn new(status: Status, body: Value) -> Self {
        Self {
            status,
            body,
            cookies: UpstreamCookies::default(),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(Status::Ok, body)
    }

    pub fn error(status: Status, message: &str) -> Self {
        Self::new(status, serde_json::to_value(ErrorBody::new(message)).unwrap_or(Value::Null))
    }

    /// Upstream status and body as-is; `null` when upstream sent no JSON.
    pub fn from_upstream(response: UpstreamResponse) -> Self {
        Self::new(Status::new(response.status), response.body.unwrap_or(Value::Null))
    }

    #[must_use]
    pub fn with_cookies(mut self, cookies: UpstreamCookies) -> Self {
        self.cookies = cookies;
        self
    }
}

impl<'r> Responder<'r, 'static> for ProxyJson {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Response::build_from(Json(self.body).respond_to(req)?).status(self.status).finalize();
        self.cookies.apply(&mut response);
        Ok(response)
    }
}

/// Sends `request` upstream and relays the answer. A transport failure becomes a 500 carrying `failure`.
pub async fn forward(upstream: &SharedUpstream, request: UpstreamRequest, failure: &str) -> Result<ProxyJson, AppError> {
    upstream
        .send(request)
        .await
        .map(ProxyJson::from_upstream)
        .map_err(|e| AppError::transport(failure, e))
}

/// Path segment taken from the local URL, re-encoded for the upstream URL.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
