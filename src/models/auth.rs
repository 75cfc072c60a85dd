use crate::models::schema::Schema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const PASSWORD_MIN_LENGTH: usize = 12;
pub const PASSWORD_MAX_LENGTH: usize = 128;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
pub struct LocalLoginRequest {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password_length"))]
    pub password: String,
}

impl LocalLoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::new("password_too_short").with_message(Cow::Borrowed("Password must be at least 12 characters")));
    }
    if length > PASSWORD_MAX_LENGTH {
        return Err(ValidationError::new("password_too_long").with_message(Cow::Borrowed("Password is too long")));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct GoogleCallbackRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing authorization code"))]
    pub code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing state"))]
    pub state: String,
}

/// Token payload returned by upstream login, callback and refresh.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// The token and lifetime to store, if upstream returned both in a usable form.
    pub fn session_cookie(&self) -> Option<(&str, i64)> {
        let token = self.access_token.as_deref().filter(|token| !token.is_empty())?;
        let expires_in = self.expires_in.filter(|seconds| *seconds > 0)?;
        Some((token, expires_in))
    }
}

/// Upstream reply to `GET /v1/auth/google/login`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GoogleLoginUpstream {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GoogleLoginResponse {
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct AdminSession {
    pub object: String,
    pub id: String,
    #[validate(email)]
    pub email: String,
    pub name: String,
}

impl Schema for AdminSession {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::app_error::AppError;

    fn first_error(request: &LocalLoginRequest) -> Option<String> {
        request
            .validate()
            .err()
            .map(|errors| AppError::from_validation(&errors, &["email", "password"]).to_string())
    }

    #[test]
    fn short_password_is_rejected() {
        let request = LocalLoginRequest::new("a@b.co", "short");
        assert_eq!(first_error(&request).as_deref(), Some("Password must be at least 12 characters"));
    }

    #[test]
    fn long_password_is_rejected() {
        let request = LocalLoginRequest::new("a@b.co", &"x".repeat(PASSWORD_MAX_LENGTH + 1));
        assert_eq!(first_error(&request).as_deref(), Some("Password is too long"));
    }

    #[test]
    fn email_is_checked_first() {
        let request = LocalLoginRequest::new("nope", "short");
        assert_eq!(first_error(&request).as_deref(), Some("Enter a valid email address"));
    }

    #[test]
    fn email_is_trimmed_before_validation() {
        let request = LocalLoginRequest::new("  admin@example.com ", "correct horse battery").normalized();
        assert_eq!(request.email, "admin@example.com");
        assert!(first_error(&request).is_none());
    }

    #[test]
    fn session_cookie_requires_token_and_positive_lifetime() {
        let token = TokenResponse {
            access_token: Some("tok_abc".to_string()),
            expires_in: Some(900),
        };
        assert_eq!(token.session_cookie(), Some(("tok_abc", 900)));

        let expired = TokenResponse {
            expires_in: Some(0),
            ..token.clone()
        };
        assert_eq!(expired.session_cookie(), None);

        let empty = TokenResponse {
            access_token: Some(String::new()),
            ..token
        };
        assert_eq!(empty.session_cookie(), None);
        assert_eq!(TokenResponse::default().session_cookie(), None);
    }

    #[test]
    fn google_redirect_uses_camel_case() {
        let response = GoogleLoginResponse {
            redirect_url: "https://accounts.google.com/o/oauth2".to_string(),
        };
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["redirectUrl"], "https://accounts.google.com/o/oauth2");
    }
}
