use crate::models::audit_log::AuditLogList;
use crate::models::list::CursorParams;
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, load};

/// One cache entry per page.
pub fn key(params: &CursorParams) -> QueryKey {
    QueryKey::new([
        "audit-logs".to_string(),
        params.limit.map(|limit| limit.to_string()).unwrap_or_default(),
        params.after.clone().unwrap_or_default(),
    ])
}

pub struct AuditLogService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> AuditLogService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        AuditLogService { transport, cache }
    }

    pub async fn list(&self, params: &CursorParams) -> Result<AuditLogList, ServiceError> {
        self.cache
            .query(key(params), self.cache.default_options(), move || {
                let request = ApiRequest::get("/organization/audit-logs").with_query(params.to_query());
                load(self.transport, request, "Failed to load audit logs")
            })
            .await
    }
}
