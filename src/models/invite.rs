use crate::models::list::ListResponse;
use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum InviteRole {
    Owner,
    Reader,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Member,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InviteProjectGrant {
    pub id: String,
    pub role: ProjectRole,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct Invite {
    pub object: String,
    pub id: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    pub status: String,
    pub invited_at: String,
    pub expires_at: String,
    #[serde(default)]
    pub accepted_at: Option<String>,
    #[serde(default)]
    pub projects: Vec<InviteProjectGrant>,
}

impl Schema for Invite {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.invite")
    }

    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

pub type InviteList = ListResponse<Invite>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct CreateInviteRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    pub role: InviteRole,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<InviteProjectGrant>,
}
