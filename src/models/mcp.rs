use crate::models::list::ListResponse;
use crate::models::schema::Schema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct McpActivity {
    pub object: String,
    pub method: String,
    #[serde(default)]
    pub tool: Option<String>,
    pub created_at: i64,
}

impl Schema for McpActivity {}

pub type McpActivityList = ListResponse<McpActivity>;
