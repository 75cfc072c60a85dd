use crate::models::list::ListResponse;
use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Reader,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct MemberUser {
    pub id: String,
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub created_at: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct OrganizationMember {
    pub object: String,
    pub role: String,
    pub joined_at: i64,
    #[validate(nested)]
    pub user: MemberUser,
}

impl Schema for OrganizationMember {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.member")
    }

    fn identity(&self) -> Option<String> {
        Some(self.user.id.clone())
    }
}

pub type MemberList = ListResponse<OrganizationMember>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}
