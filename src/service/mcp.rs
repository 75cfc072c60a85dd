use crate::models::mcp::McpActivityList;
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, load};

pub fn key() -> QueryKey {
    QueryKey::new(["mcp-activity"])
}

pub struct McpService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> McpService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        McpService { transport, cache }
    }

    pub async fn list(&self) -> Result<McpActivityList, ServiceError> {
        self.cache
            .query(key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/mcp/activity"), "Failed to load MCP activity")
            })
            .await
    }
}
