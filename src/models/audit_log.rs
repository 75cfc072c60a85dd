use crate::models::list::ListResponse;
use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct AuditLog {
    pub object: String,
    pub id: i64,
    pub event: String,
    #[serde(default)]
    pub user_email: Option<String>,
    pub metadata: Map<String, Value>,
    pub created_at: String,
}

impl Schema for AuditLog {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.audit_log")
    }

    fn identity(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

pub type AuditLogList = ListResponse<AuditLog>;
