use crate::models::overview::OrganizationOverview;
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, load};

/// Counts shown on the landing page. Writes elsewhere invalidate it.
pub fn key() -> QueryKey {
    QueryKey::new(["organization-overview"])
}

pub struct OverviewService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> OverviewService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        OverviewService { transport, cache }
    }

    pub async fn get(&self) -> Result<OrganizationOverview, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/overview"), "Failed to load organization overview")
            })
            .await
    }
}
