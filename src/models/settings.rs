use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct SmtpSettings {
    pub object: String,
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[validate(email)]
    pub from_email: String,
    #[serde(default)]
    pub has_password: bool,
}

impl Schema for SmtpSettings {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.smtp_settings")
    }
}

/// SMTP update. An absent password leaves the stored one in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct SmtpSettingsUpdate {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[validate(email(message = "Enter a valid sender email address"))]
    pub from_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SmtpSettingsUpdate {
    /// Drops a blank password so an untouched form field does not wipe the stored secret.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.password = self.password.filter(|password| !password.is_empty());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct WorkspaceQuotaOverride {
    pub user_public_id: String,
    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    pub limit: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct WorkspaceQuota {
    pub object: String,
    #[validate(range(min = 1))]
    pub default_limit: i64,
    #[serde(default)]
    #[validate(nested)]
    pub overrides: Vec<WorkspaceQuotaOverride>,
}

impl Schema for WorkspaceQuota {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.workspace_quota")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct WorkspaceQuotaUpdate {
    #[validate(range(min = 1, message = "Default limit must be at least 1"))]
    pub default_limit: i64,
    #[serde(default)]
    #[validate(nested)]
    pub overrides: Vec<WorkspaceQuotaOverride>,
}
