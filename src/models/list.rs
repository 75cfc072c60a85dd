use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationErrors};

/// Upstream list envelope: `{ object: "list", data, total?, first_id?, last_id?, has_more? }`.
///
/// Cursors are opaque; they are passed back to upstream untouched.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub object: String,
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            object: "list".to_string(),
            data,
            total: None,
            first_id: None,
            last_id: None,
            has_more: None,
        }
    }
}

impl<T: Validate> Validate for ListResponse<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        for item in &self.data {
            item.validate()?;
        }
        Ok(())
    }
}

impl<T: Schema> Schema for ListResponse<T> {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "list")?;

        let mut seen = HashSet::new();
        for item in &self.data {
            item.check_shape()?;
            if let Some(id) = item.identity()
                && !seen.insert(id.clone())
            {
                return Err(format!("duplicate item id \"{id}\" in list"));
            }
        }
        Ok(())
    }
}

/// Cursor parameters for upstream list endpoints that page with `limit`/`after`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CursorParams {
    pub limit: Option<u32>,
    pub after: Option<String>,
}

impl CursorParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(after) = self.after.as_ref().filter(|after| !after.is_empty()) {
            query.push(("after".to_string(), after.clone()));
        }
        query
    }
}
