use crate::models::schema::{Schema, expect_object};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectCounts {
    pub total: u64,
    pub active: u64,
    pub archived: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MemberCounts {
    pub total: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InviteCounts {
    pub pending: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProviderCounts {
    pub active: u64,
    pub inactive: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct OrganizationOverview {
    pub object: String,
    pub projects: ProjectCounts,
    pub members: MemberCounts,
    pub invites: InviteCounts,
    pub providers: ProviderCounts,
}

impl Schema for OrganizationOverview {
    fn check_shape(&self) -> Result<(), String> {
        expect_object(&self.object, "organization.overview")
    }
}
