use crate::models::api_key::{AdminApiKey, AdminApiKeyList, CreateApiKeyRequest};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, load, raw_body, submit, submit_as};
use serde_json::Value;

pub fn key() -> QueryKey {
    QueryKey::new(["admin-api-keys"])
}

pub struct ApiKeyService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> ApiKeyService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        ApiKeyService { transport, cache }
    }

    pub async fn list(&self) -> Result<AdminApiKeyList, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/admin-api-keys"), "Failed to load admin API keys")
            })
            .await
    }

    /// The returned key carries `value`, which upstream shows only once.
    pub async fn create(&self, name: &str) -> Result<AdminApiKey, ServiceError> {
        let body = checked_body(
            &CreateApiKeyRequest {
                name: name.trim().to_string(),
            },
            &["name"],
            "Invalid API key payload",
        )?;
        let request = ApiRequest::post("/organization/admin-api-keys").with_body(body);
        let request = &request;
        self.cache
            .mutate(&[key()], move || submit_as(self.transport, request.clone(), "Failed to create admin API key"))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ServiceError> {
        let request = ApiRequest::delete(format!("/organization/admin-api-keys/{}", urlencoding::encode(id)));
        let request = &request;
        self.cache
            .mutate(&[key()], move || async move {
                submit(self.transport, request.clone(), "Failed to delete admin API key").await.map(raw_body)
            })
            .await
    }
}
