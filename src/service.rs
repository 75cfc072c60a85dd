//! Client-side Resource Services.
//!
//! Each service borrows an [`transport::ApiTransport`] and a [`cache::QueryCache`], calls the
//! admin proxy, and hands back schema-checked models.

pub mod api_keys;
pub mod audit_logs;
pub mod cache;
pub mod invites;
pub mod mcp;
pub mod members;
pub mod overview;
pub mod projects;
pub mod providers;
pub mod refresher;
pub mod session;
pub mod settings;
pub mod transport;

use crate::models::schema::{Schema, first_validation_message, parse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use transport::{ApiRequest, ApiResponse, ApiTransport};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    /// The proxy answered with something the models do not accept. `detail` is for logs.
    #[error("{message}")]
    Schema { message: String, detail: String },
}

impl ServiceError {
    /// Worth another attempt: the network failed or the server did.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Transport(_) => true,
            ServiceError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub(crate) async fn send<T: ApiTransport + ?Sized>(transport: &T, request: ApiRequest) -> Result<ApiResponse, ServiceError> {
    transport.send(request).await.map_err(|e| ServiceError::Transport(e.to_string()))
}

/// GET-style call: any non-success status becomes `failure`, the body is decoded as `S`.
pub(crate) async fn load<S: Schema, T: ApiTransport + ?Sized>(transport: &T, request: ApiRequest, failure: &str) -> Result<S, ServiceError> {
    let response = send(transport, request).await?;
    if !response.is_success() {
        return Err(ServiceError::Http {
            status: response.status,
            message: failure.to_string(),
        });
    }
    decode(response, failure)
}

/// Write call: a non-success status carries the proxy's `error` message, or `fallback`.
pub(crate) async fn submit<T: ApiTransport + ?Sized>(transport: &T, request: ApiRequest, fallback: &str) -> Result<ApiResponse, ServiceError> {
    let response = send(transport, request).await?;
    if !response.is_success() {
        return Err(ServiceError::Http {
            status: response.status,
            message: response.error_message().unwrap_or(fallback).to_string(),
        });
    }
    Ok(response)
}

/// Write call whose answer is a typed resource.
pub(crate) async fn submit_as<S: Schema, T: ApiTransport + ?Sized>(transport: &T, request: ApiRequest, failure: &str) -> Result<S, ServiceError> {
    let response = submit(transport, request, failure).await?;
    decode(response, failure)
}

pub(crate) fn decode<S: Schema>(response: ApiResponse, failure: &str) -> Result<S, ServiceError> {
    parse(response.body.unwrap_or(Value::Null)).map_err(|detail| {
        warn!(detail = %detail, "admin api response failed schema check");
        ServiceError::Schema {
            message: failure.to_string(),
            detail,
        }
    })
}

/// Validates a request body and turns it into JSON, reporting the first failing field.
pub(crate) fn checked_body<B: Serialize + Validate>(body: &B, field_order: &[&str], fallback: &str) -> Result<Value, ServiceError> {
    body.validate().map_err(|errors| {
        ServiceError::Validation(first_validation_message(&errors, field_order).unwrap_or_else(|| fallback.to_string()))
    })?;
    serde_json::to_value(body).map_err(|e| ServiceError::Validation(format!("{fallback}: {e}")))
}

/// Body returned by writes whose response shape upstream does not pin down.
pub(crate) fn raw_body(response: ApiResponse) -> Value {
    response.body.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Project;
    use crate::test_utils::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn load_hides_server_message_behind_failure_text() {
        let transport = FakeTransport::new();
        transport.respond("GET", "/organization/overview", 503, json!({"error": "db down"}));

        let result = load::<crate::models::overview::OrganizationOverview, _>(&transport, ApiRequest::get("/organization/overview"), "Failed to load overview").await;
        assert_eq!(
            result,
            Err(ServiceError::Http {
                status: 503,
                message: "Failed to load overview".to_string()
            })
        );
    }

    #[tokio::test]
    async fn submit_surfaces_server_message() {
        let transport = FakeTransport::new();
        transport.respond("DELETE", "/organization/invites/inv_1", 409, json!({"error": "Invite already accepted"}));

        let result = submit(&transport, ApiRequest::delete("/organization/invites/inv_1"), "Failed to delete invite").await;
        assert_eq!(
            result,
            Err(ServiceError::Http {
                status: 409,
                message: "Invite already accepted".to_string()
            })
        );
    }

    #[test]
    fn decode_reports_schema_mismatch_with_failure_message() {
        let response = ApiResponse::new(200, json!({"object": "project", "id": 7}));
        let error = decode::<Project>(response, "Failed to load project").unwrap_err();
        assert!(matches!(error, ServiceError::Schema { ref message, .. } if message == "Failed to load project"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn retryable_errors() {
        assert!(ServiceError::Transport("reset".to_string()).is_retryable());
        assert!(
            ServiceError::Http {
                status: 502,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!ServiceError::Unauthorized.is_retryable());
        assert!(!ServiceError::Validation("bad".to_string()).is_retryable());
    }
}
