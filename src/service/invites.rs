use crate::models::invite::{CreateInviteRequest, Invite, InviteList};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, load, overview, raw_body, submit, submit_as};
use serde_json::Value;

pub fn key() -> QueryKey {
    QueryKey::new(["invites"])
}

fn invalidates() -> [QueryKey; 2] {
    [key(), overview::key()]
}

pub struct InviteService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> InviteService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        InviteService { transport, cache }
    }

    pub async fn list(&self) -> Result<InviteList, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/invites"), "Failed to load invites")
            })
            .await
    }

    /// Roles are closed enums, so only the email can fail here.
    pub async fn create(&self, invite: &CreateInviteRequest) -> Result<Invite, ServiceError> {
        let body = checked_body(invite, &["email"], "Invalid invite payload")?;
        let request = ApiRequest::post("/organization/invites").with_body(body);
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to create invite"))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ServiceError> {
        let request = ApiRequest::delete(format!("/organization/invites/{}", urlencoding::encode(id)));
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || async move {
                submit(self.transport, request.clone(), "Failed to delete invite").await.map(raw_body)
            })
            .await
    }
}
