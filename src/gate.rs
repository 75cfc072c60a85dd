//! Redirect decisions for admin pages.
//!
//! The gate only checks that a session cookie exists. Whether the token is any good is for the
//! upstream API to decide on the first data call.

use crate::auth::has_access_token;
use crate::config::{AdminConfig, Config};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { location: String },
    RedirectToLanding { location: String },
}

/// True when `path` is `prefix` itself or lies below it. `/administrator` is not under `/admin`.
pub fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn is_public(path: &str, rules: &AdminConfig) -> bool {
    rules.public_paths.iter().any(|public| is_under(path, public))
}

pub fn decide(path: &str, has_token: bool, rules: &AdminConfig) -> GateDecision {
    let public = is_public(path, rules);

    if is_under(path, &rules.prefix) && !public && !has_token {
        return GateDecision::RedirectToLogin {
            location: format!("{}?next={}", rules.login_path, urlencoding::encode(path)),
        };
    }

    if public && has_token {
        return GateDecision::RedirectToLanding {
            location: rules.landing_path.clone(),
        };
    }

    GateDecision::Allow
}

/// Request guard running [`decide`] for the current request path and cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision(pub GateDecision);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AccessDecision {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(config) = req.rocket().state::<Config>() else {
            return Outcome::Error((Status::InternalServerError, ()));
        };

        let path = req.uri().path();
        let decision = decide(path.as_str(), has_access_token(req), &config.admin);
        if decision != GateDecision::Allow {
            debug!(path = %path, ?decision, "admin gate redirect");
        }
        Outcome::Success(AccessDecision(decision))
    }
}
