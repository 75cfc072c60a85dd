//! Explicit query cache for Resource Services.
//!
//! Reads are cached per key and served until they go stale; writes invalidate by key prefix.
//! The cache is a plain value owned by the caller and handed to each service.

use crate::service::ServiceError;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(parts.into_iter().map(Into::into).collect())
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_after: Duration,
    pub retries: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub stale_after: Duration,
    pub query_retries: u32,
    pub mutation_retries: u32,
    pub retry_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(30),
            query_retries: 1,
            mutation_retries: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

/// Cached entries plus a generation bumped on every invalidation. A read that started before a
/// bump must not store its result.
#[derive(Default)]
struct Store {
    entries: HashMap<QueryKey, Entry>,
    generation: u64,
}

#[derive(Default)]
pub struct QueryCache {
    config: CacheConfig,
    store: Mutex<Store>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            store: Mutex::new(Store::default()),
        }
    }

    pub fn default_options(&self) -> QueryOptions {
        QueryOptions {
            stale_after: self.config.stale_after,
            retries: self.config.query_retries,
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value for `key` regardless of age.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.store().entries.get(key)?.value.downcast_ref::<T>().cloned()
    }

    fn generation(&self) -> u64 {
        self.store().generation
    }

    fn fresh<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey, stale_after: Duration) -> Option<T> {
        let store = self.store();
        let entry = store.entries.get(key)?;
        if entry.fetched_at.elapsed() >= stale_after {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Stores `value` unless the cache was invalidated since `generation` was read.
    fn store_if_current<T: Send + Sync + 'static>(&self, key: QueryKey, value: T, generation: u64) {
        let mut store = self.store();
        if store.generation != generation {
            debug!(key = ?key, "dropping read that overlapped an invalidation");
            return;
        }
        store.entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Serves a fresh cached value or runs `fetch` (with retries) and caches the result.
    /// Failures are never cached.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetch: F) -> Result<T, ServiceError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        if let Some(value) = self.fresh::<T>(&key, options.stale_after) {
            return Ok(value);
        }

        let generation = self.generation();
        let value = self.with_retries(options.retries, fetch).await?;
        self.store_if_current(key, value.clone(), generation);
        Ok(value)
    }

    /// Runs a write and, once it succeeds, invalidates every key under each of `invalidates`.
    pub async fn mutate<T, F, Fut>(&self, invalidates: &[QueryKey], run: F) -> Result<T, ServiceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let value = self.with_retries(self.config.mutation_retries, run).await?;
        for prefix in invalidates {
            self.invalidate(prefix);
        }
        Ok(value)
    }

    pub fn invalidate(&self, prefix: &QueryKey) {
        let mut store = self.store();
        store.generation += 1;
        let before = store.entries.len();
        store.entries.retain(|key, _| !key.starts_with(prefix));
        debug!(key = ?prefix, dropped = before - store.entries.len(), "invalidated cached queries");
    }

    pub fn clear(&self) {
        let mut store = self.store();
        store.generation += 1;
        store.entries.clear();
    }

    async fn with_retries<T, F, Fut>(&self, retries: u32, run: F) -> Result<T, ServiceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let mut attempt = 0;
        loop {
            match run().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < retries && error.is_retryable() => {
                    attempt += 1;
                    debug!(attempt, error = %error, "retrying admin api call");
                    if !self.config.retry_delay.is_zero() {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }
}
