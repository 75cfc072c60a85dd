use crate::middleware::rate_limit::RateLimitRetryAfter;
use crate::models::error::ErrorBody;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{Request, Responder, catch};

#[catch(400)]
pub fn bad_request(_: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Invalid payload"))
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Not found"))
}

#[catch(413)]
pub fn payload_too_large(_: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Payload too large"))
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Invalid payload"))
}

#[derive(Responder)]
#[response(status = 429)]
pub struct TooManyRequests {
    body: Json<ErrorBody>,
    retry_after: Header<'static>,
}

impl TooManyRequests {
    pub fn new(retry_after_secs: u64) -> Self {
        TooManyRequests {
            body: Json(ErrorBody::new("Too many requests")),
            retry_after: Header::new("Retry-After", retry_after_secs.to_string()),
        }
    }
}

#[catch(429)]
pub fn too_many_requests(req: &Request) -> TooManyRequests {
    let retry_after = req.local_cache(|| None::<RateLimitRetryAfter>).as_ref().map(|r| r.0).unwrap_or(60);
    TooManyRequests::new(retry_after)
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error"))
}
