use crate::models::list::ListResponse;
use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct Project {
    pub object: String,
    pub id: String,
    pub name: String,
    pub created_at: i64,
    #[serde(default)]
    pub archived_at: Option<i64>,
    pub status: String,
}

impl Schema for Project {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "project")
    }

    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

pub type ProjectList = ListResponse<Project>;

/// Body for both create and rename. The name is trimmed before it is validated or sent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct ProjectNameRequest {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
}

impl ProjectNameRequest {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim().to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let request = ProjectNameRequest::new("  Research  ");
        assert_eq!(request.name, "Research");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(ProjectNameRequest::new("   ").validate().is_err());
    }
}
