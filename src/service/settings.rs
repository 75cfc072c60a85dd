use crate::models::settings::{SmtpSettings, SmtpSettingsUpdate, WorkspaceQuota, WorkspaceQuotaUpdate};
use crate::service::cache::{QueryCache, QueryKey};
use crate::service::transport::{ApiRequest, ApiTransport};
use crate::service::{ServiceError, checked_body, load, submit_as};

pub fn smtp_key() -> QueryKey {
    QueryKey::new(["smtp-settings"])
}

pub fn workspace_quota_key() -> QueryKey {
    QueryKey::new(["workspace-quota"])
}

pub struct SettingsService<'a, T: ApiTransport + ?Sized> {
    transport: &'a T,
    cache: &'a QueryCache,
}

impl<'a, T: ApiTransport + ?Sized> SettingsService<'a, T> {
    pub fn new(transport: &'a T, cache: &'a QueryCache) -> Self {
        SettingsService { transport, cache }
    }

    pub async fn smtp(&self) -> Result<SmtpSettings, ServiceError> {
        self.cache
            .query(smtp_key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/settings/smtp"), "Failed to load SMTP settings")
            })
            .await
    }

    pub async fn update_smtp(&self, update: SmtpSettingsUpdate) -> Result<SmtpSettings, ServiceError> {
        let body = checked_body(&update.normalized(), &["from_email"], "Invalid SMTP settings")?;
        let request = ApiRequest::put("/organization/settings/smtp").with_body(body);
        let request = &request;
        self.cache
            .mutate(&[smtp_key()], move || submit_as(self.transport, request.clone(), "Failed to update SMTP settings"))
            .await
    }

    pub async fn workspace_quota(&self) -> Result<WorkspaceQuota, ServiceError> {
        self.cache
            .query(workspace_quota_key(), self.cache.default_options(), move || {
                load(self.transport, ApiRequest::get("/organization/settings/workspace-quotas"), "Failed to load workspace quotas")
            })
            .await
    }

    pub async fn update_workspace_quota(&self, update: &WorkspaceQuotaUpdate) -> Result<WorkspaceQuota, ServiceError> {
        let body = checked_body(update, &["default_limit", "overrides"], "Invalid workspace quota")?;
        let request = ApiRequest::put("/organization/settings/workspace-quotas").with_body(body);
        let request = &request;
        self.cache
            .mutate(&[workspace_quota_key()], move || {
                submit_as(self.transport, request.clone(), "Failed to update workspace quotas")
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::WorkspaceQuotaOverride;
    use crate::test_utils::FakeTransport;
    use serde_json::{Value, json};

    fn smtp_json() -> Value {
        json!({
            "object": "organization.smtp_settings",
            "enabled": true,
            "host": "smtp.example.com",
            "port": 587,
            "username": "mailer",
            "from_email": "noreply@example.com",
            "has_password": true
        })
    }

    fn update(password: Option<&str>) -> SmtpSettingsUpdate {
        SmtpSettingsUpdate {
            enabled: true,
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            from_email: "noreply@example.com".to_string(),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn blank_password_is_not_sent() {
        let transport = FakeTransport::new();
        transport.respond("PUT", "/organization/settings/smtp", 200, smtp_json());
        let cache = QueryCache::default();
        let service = SettingsService::new(&transport, &cache);

        service.update_smtp(update(Some(""))).await.expect("smtp settings");
        service.update_smtp(update(Some("s3cret"))).await.expect("smtp settings");

        let bodies: Vec<Value> = transport.requests().into_iter().filter_map(|r| r.body).collect();
        assert!(bodies[0].get("password").is_none());
        assert_eq!(bodies[1]["password"], "s3cret");
    }

    #[tokio::test]
    async fn update_refreshes_cached_settings() {
        let transport = FakeTransport::new();
        transport.respond("GET", "/organization/settings/smtp", 200, smtp_json());
        transport.respond("PUT", "/organization/settings/smtp", 200, smtp_json());
        let cache = QueryCache::default();
        let service = SettingsService::new(&transport, &cache);

        service.smtp().await.expect("smtp settings");
        service.update_smtp(update(None)).await.expect("smtp settings");
        service.smtp().await.expect("smtp settings");
        assert_eq!(transport.count("GET", "/organization/settings/smtp"), 2);
    }

    #[tokio::test]
    async fn quota_limits_are_validated() {
        let transport = FakeTransport::new();
        let cache = QueryCache::default();
        let service = SettingsService::new(&transport, &cache);

        let update = WorkspaceQuotaUpdate {
            default_limit: 0,
            overrides: Vec::new(),
        };
        assert_eq!(
            service.update_workspace_quota(&update).await,
            Err(ServiceError::Validation("Default limit must be at least 1".to_string()))
        );

        let update = WorkspaceQuotaUpdate {
            default_limit: 5,
            overrides: vec![WorkspaceQuotaOverride {
                user_public_id: "usr_1".to_string(),
                limit: 0,
            }],
        };
        assert!(matches!(service.update_workspace_quota(&update).await, Err(ServiceError::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn quota_is_loaded() {
        let transport = FakeTransport::new();
        transport.respond(
            "GET",
            "/organization/settings/workspace-quotas",
            200,
            json!({"object": "organization.workspace_quota", "default_limit": 3, "overrides": [{"user_public_id": "usr_1", "limit": 10}]}),
        );
        let cache = QueryCache::default();

        let quota = SettingsService::new(&transport, &cache).workspace_quota().await.expect("quota");
        assert_eq!(quota.default_limit, 3);
        assert_eq!(quota.overrides[0].limit, 10);
    }
}
