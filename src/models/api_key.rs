use crate::models::list::ListResponse;
use crate::models::schema::Schema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiKeyOwner {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct AdminApiKey {
    pub object: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub redacted_value: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub last_used_at: Option<i64>,
    #[serde(default)]
    pub owner: Option<ApiKeyOwner>,
    /// Only present in the create response; upstream never returns it again.
    #[serde(default)]
    pub value: Option<String>,
}

impl Schema for AdminApiKey {
    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

pub type AdminApiKeyList = ListResponse<AdminApiKey>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, message = "API key name is required"))]
    pub name: String,
}
