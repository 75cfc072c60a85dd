use crate::models::provider::{CreateProviderRequest, Provider, ProviderList, ProviderVendorList, UpdateProviderRequest};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, load, overview, raw_body, submit, submit_as};
use serde_json::Value;

pub fn key() -> QueryKey {
    QueryKey::new(["providers"])
}

pub fn vendors_key() -> QueryKey {
    QueryKey::new(["provider-vendors"])
}

fn invalidates() -> [QueryKey; 2] {
    [key(), overview::key()]
}

fn provider_path(id: &str) -> String {
    format!("/organization/models/providers/{}", urlencoding::encode(id))
}

pub struct ProviderService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> ProviderService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        ProviderService { transport, cache }
    }

    pub async fn list(&self) -> Result<ProviderList, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/models/providers"), "Failed to load providers")
            })
            .await
    }

    pub async fn vendors(&self) -> Result<ProviderVendorList, ServiceError> {
        self.cache
            .query(vendors_key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/providers/vendors"), "Failed to load provider vendors")
            })
            .await
    }

    pub async fn create(&self, provider: &CreateProviderRequest) -> Result<Provider, ServiceError> {
        let body = checked_body(provider, &["name", "vendor", "base_url"], "Invalid provider payload")?;
        let request = ApiRequest::post("/organization/models/providers").with_body(body);
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to create provider"))
            .await
    }

    pub async fn update(&self, id: &str, patch: &UpdateProviderRequest) -> Result<Provider, ServiceError> {
        let body = checked_body(patch, &["name"], "Invalid provider payload")?;
        let request = ApiRequest::patch(provider_path(id)).with_body(body);
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || submit_as(self.transport, request.clone(), "Failed to update provider"))
            .await
    }

    /// Asks upstream to refresh the provider's model catalog.
    pub async fn sync(&self, id: &str) -> Result<Value, ServiceError> {
        let request = ApiRequest::post(format!("{}/sync", provider_path(id)));
        let request = &request;
        self.cache
            .mutate(&invalidates(), move || async move {
                submit(self.transport, request.clone(), "Failed to sync provider models").await.map(raw_body)
            })
            .await
    }
}
