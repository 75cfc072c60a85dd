//! Client for the upstream Jan API.
//!
//! Every proxy endpoint funnels through [`UpstreamApi::send`]. The trait is the seam the
//! route tests use to swap in an in-memory upstream.

use crate::config::UpstreamConfig;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub type SharedUpstream = Arc<dyn UpstreamApi>;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
    #[cfg(test)]
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

/// What the browser handed us that upstream needs to see: the access token and the raw
/// cookie header (the latter carries upstream-owned cookies such as the refresh cookie).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamCredentials {
    pub access_token: Option<String>,
    pub cookie_header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub credentials: UpstreamCredentials,
}

impl UpstreamRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            credentials: UpstreamCredentials::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: UpstreamCredentials) -> Self {
        self.credentials = credentials;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Parsed JSON body, `None` when upstream sent nothing or something that is not JSON.
    pub body: Option<Value>,
    /// Raw `Set-Cookie` header values, untouched.
    pub set_cookies: Vec<String>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of an upstream error envelope, if there is one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }
}

#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

pub struct HttpUpstream {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut base_url = Url::parse(config.base_url.trim())?;
        // Url::join drops the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn url_for(&self, path: &str, query: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.set_query(query);
        Ok(url)
    }
}

#[async_trait]
impl UpstreamApi for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(&request.path, request.query.as_deref())?;
        debug!(method = %request.method, url = %url, "forwarding request upstream");

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(token) = &request.credentials.access_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie_header) = &request.credentials.cookie_header {
            builder = builder.header(COOKIE, cookie_header);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();

        debug!(method = %request.method, path = %request.path, status, "upstream responded");

        Ok(UpstreamResponse { status, body, set_cookies })
    }
}
