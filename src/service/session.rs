//! Admin session: who is signed in, and the login/logout flows that set or clear the cookie.

use crate::models::auth::{AdminSession, GoogleCallbackRequest, GoogleLoginResponse, LocalLoginRequest};
use crate::service::cache::{QueryCache, QueryKey, QueryOptions};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, decode, send, submit};
use std::time::Duration;
use tracing::debug;

const SESSION_FAILURE: &str = "Failed to load session";

pub fn key() -> QueryKey {
    QueryKey::new(["admin-session"])
}

/// Session reads are cached longer and never retried: a 401 is an answer, not a glitch.
pub fn session_options() -> QueryOptions {
    QueryOptions {
        stale_after: Duration::from_secs(60),
        retries: 0,
    }
}

pub struct SessionService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> SessionService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        SessionService { transport, cache }
    }

    pub async fn me(&self) -> Result<AdminSession, ServiceError> {
        self.cache.query(key(), session_options(), move || self.fetch_me()).await
    }

    async fn fetch_me(&self) -> Result<AdminSession, ServiceError> {
        let response = send(self.transport, ApiRequest::get("/auth/me")).await?;
        if response.status == 401 {
            return Err(ServiceError::Unauthorized);
        }
        if !response.is_success() {
            return Err(ServiceError::Http {
                status: response.status,
                message: SESSION_FAILURE.to_string(),
            });
        }
        decode(response, SESSION_FAILURE)
    }

    /// Validated locally first; an invalid form never reaches the proxy.
    pub async fn login_local(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        let login = LocalLoginRequest::new(email, password).normalized();
        let body = checked_body(&login, &["email", "password"], "Invalid login payload")?;

        submit(self.transport, ApiRequest::post("/auth/local/login").with_body(body), "Invalid email or password").await?;
        self.cache.invalidate(&key());
        Ok(())
    }

    pub async fn google_login_url(&self) -> Result<String, ServiceError> {
        let response = submit(self.transport, ApiRequest::get("/auth/google/login"), "Unable to initialise Google login").await?;
        let login: GoogleLoginResponse = serde_json::from_value(response.body.unwrap_or_default()).map_err(|e| ServiceError::Schema {
            message: "Unable to initialise Google login".to_string(),
            detail: e.to_string(),
        })?;
        Ok(login.redirect_url)
    }

    pub async fn google_callback(&self, code: &str, state: &str) -> Result<(), ServiceError> {
        let callback = GoogleCallbackRequest {
            code: code.to_string(),
            state: state.to_string(),
        };
        let body = checked_body(&callback, &["code", "state"], "Invalid callback payload")?;

        submit(self.transport, ApiRequest::post("/auth/google/callback").with_body(body), "Google authentication failed").await?;
        self.cache.invalidate(&key());
        Ok(())
    }

    pub async fn refresh(&self) -> Result<(), ServiceError> {
        submit(self.transport, ApiRequest::get("/auth/refresh-token"), "Unable to refresh").await?;
        self.cache.invalidate(&key());
        Ok(())
    }

    /// Forgets every cached read whatever the outcome; the proxy clears the cookie either way.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        let result = submit(self.transport, ApiRequest::post("/auth/logout"), "Failed to revoke session").await;
        self.cache.clear();
        if let Err(e) = &result {
            debug!(error = %e, "logout did not complete upstream");
        }
        result.map(|_| ())
    }
}
