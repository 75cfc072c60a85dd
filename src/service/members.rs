use crate::models::member::{MemberList, MemberRole, OrganizationMember, UpdateMemberRoleRequest};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, load, overview, submit_as};
use serde_json::json;

pub fn key() -> QueryKey {
    QueryKey::new(["organization-members"])
}

pub struct MemberService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> MemberService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        MemberService { transport, cache }
    }

    pub async fn list(&self) -> Result<MemberList, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/members"), "Failed to load organization members")
            })
            .await
    }

    pub async fn update_role(&self, user_id: &str, role: MemberRole) -> Result<OrganizationMember, ServiceError> {
        let request = ApiRequest::patch(format!("/organization/members/{}", urlencoding::encode(user_id))).with_body(json!(UpdateMemberRoleRequest { role }));
        let request = &request;
        self.cache
            .mutate(&[key(), overview::key()], move || {
                submit_as(self.transport, request.clone(), "Failed to update organization member")
            })
            .await
    }
}
