use crate::models::list::ListResponse;
use crate::models::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct Provider {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub vendor: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    pub scope: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub last_synced_at: Option<i64>,
    #[serde(default)]
    pub sync_latency_ms: Option<i64>,
    #[serde(default)]
    pub api_key_hint: Option<String>,
    #[serde(default)]
    pub models_count: u64,
}

impl Schema for Provider {
    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

pub type ProviderList = ListResponse<Provider>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct ProviderVendor {
    pub key: String,
    pub name: String,
    pub scope: String,
    #[serde(default)]
    pub default_base_url: Option<String>,
    #[serde(default)]
    pub credential_hint: Option<String>,
}

impl Schema for ProviderVendor {
    fn identity(&self) -> Option<String> {
        Some(self.key.clone())
    }
}

pub type ProviderVendorList = ListResponse<ProviderVendor>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Select a vendor"))]
    pub vendor: String,
    #[validate(length(min = 1, message = "Base URL is required"))]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_public_id: Option<String>,
}

/// Partial update; only the fields that are set reach upstream.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateProviderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
