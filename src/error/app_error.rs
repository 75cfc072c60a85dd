use crate::models::error::ErrorBody;
use crate::models::schema::first_validation_message;
use crate::upstream::UpstreamError;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Errors surfaced by the proxy endpoints. Every variant renders as `{ "error": <Display> }`.
///
/// `Transport` carries a fixed, user-facing message; the underlying cause only goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: UpstreamError,
    },
    #[error("{0}")]
    BadGateway(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error")]
    ConfigurationError { message: String },
}

impl AppError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>, source: UpstreamError) -> Self {
        Self::Transport {
            message: message.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError { message: message.into() }
    }

    /// Picks the message of the first failing field, following the given field order.
    pub fn from_validation(errors: &ValidationErrors, field_order: &[&str]) -> Self {
        let message = first_validation_message(errors, field_order).unwrap_or_else(|| "Invalid payload".to_string());
        Self::Validation(message)
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Validation(_) => Status::BadRequest,
            AppError::Upstream { status, .. } => Status::new(*status),
            AppError::Transport { .. } => Status::InternalServerError,
            AppError::BadGateway(_) => Status::BadGateway,
            AppError::NotFound(_) => Status::NotFound,
            AppError::ConfigurationError { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let status = Status::from(&self);
        if status.class().is_server_error() {
            error!(
                error = ?self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status.code,
                "request failed"
            );
        } else {
            warn!(
                error = %self,
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = status.code,
                "request rejected"
            );
        }

        let body = ErrorBody { error: self.to_string() };
        Response::build_from(Json(body).respond_to(req)?).status(status).ok()
    }
}

impl From<rocket_cors::Error> for AppError {
    fn from(e: rocket_cors::Error) -> Self {
        AppError::configuration(format!("Invalid CORS configuration: {e}"))
    }
}
