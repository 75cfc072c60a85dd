//! Keeps the access token alive while an admin page is open.
//!
//! The loop ticks at a fixed period shorter than the token lifetime and only refreshes when
//! the page is visible and under the protected prefix. Failures are left to the next tick or
//! to the next 401 from a data call.

use crate::config::Config;
use crate::gate::is_under;
use crate::service::cache::QueryCache;
use crate::service::session::SessionService;
use crate::service::transport::ApiTransport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// What the refresher needs to know about the page currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub path: String,
    pub visible: bool,
}

impl PageState {
    pub fn new(path: impl Into<String>, visible: bool) -> Self {
        Self { path: path.into(), visible }
    }
}

#[derive(Debug, Clone)]
pub struct RefresherSettings {
    pub interval: Duration,
    pub protected_prefix: String,
}

impl Default for RefresherSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(12 * 60),
            protected_prefix: "/admin".to_string(),
        }
    }
}

impl RefresherSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_secs(config.session.refresh_interval_seconds.max(1)),
            protected_prefix: config.admin.prefix.clone(),
        }
    }
}

pub struct SessionRefresher;

/// Dropping the handle stops the loop as well.
pub struct RefresherHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefresherHandle {
    pub async fn cancel(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl SessionRefresher {
    pub fn spawn<T>(transport: Arc<T>, cache: Arc<QueryCache>, page: watch::Receiver<PageState>, settings: RefresherSettings) -> RefresherHandle
    where
        T: ApiTransport + ?Sized + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(interval_secs = settings.interval.as_secs(), "session refresher started");
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let state = page.borrow().clone();
                        if !should_refresh(&state, &settings.protected_prefix) {
                            continue;
                        }
                        if let Err(e) = SessionService::new(transport.as_ref(), cache.as_ref()).refresh().await {
                            debug!(error = %e, "session refresh failed");
                        }
                    }
                }
            }
            debug!("session refresher stopped");
        });

        RefresherHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

fn should_refresh(state: &PageState, protected_prefix: &str) -> bool {
    state.visible && is_under(&state.path, protected_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::AdminSession;
    use crate::service::session;
    use crate::test_utils::FakeTransport;

    const REFRESH: &str = "/auth/refresh-token";

    fn settings() -> RefresherSettings {
        RefresherSettings::default()
    }

    #[test]
    fn settings_follow_config() {
        let mut config = Config::default();
        config.session.refresh_interval_seconds = 300;
        let settings = RefresherSettings::from_config(&config);
        assert_eq!(settings.interval, Duration::from_secs(300));
        assert_eq!(settings.protected_prefix, "/admin");
        assert_eq!(RefresherSettings::from_config(&Config::default()).interval, RefresherSettings::default().interval);
    }

    #[test]
    fn refresh_prefix_matches_whole_segments() {
        assert!(should_refresh(&PageState::new("/admin", true), "/admin"));
        assert!(should_refresh(&PageState::new("/admin/members", true), "/admin"));
        assert!(!should_refresh(&PageState::new("/administrator", true), "/admin"));
        assert!(!should_refresh(&PageState::new("/admin/members", false), "/admin"));
    }

    async fn run_for(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_per_interval_on_visible_admin_page() {
        let transport = Arc::new(FakeTransport::new());
        let cache = Arc::new(QueryCache::default());
        let (_page_tx, page_rx) = watch::channel(PageState::new("/admin/projects", true));

        let handle = SessionRefresher::spawn(transport.clone(), cache.clone(), page_rx, settings());

        run_for(Duration::from_secs(719)).await;
        assert_eq!(transport.count("GET", REFRESH), 0);

        run_for(Duration::from_secs(2)).await;
        assert_eq!(transport.count("GET", REFRESH), 1);

        run_for(Duration::from_secs(720)).await;
        assert_eq!(transport.count("GET", REFRESH), 2);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn skips_hidden_and_public_pages() {
        let transport = Arc::new(FakeTransport::new());
        let cache = Arc::new(QueryCache::default());
        let (page_tx, page_rx) = watch::channel(PageState::new("/admin/projects", false));

        let handle = SessionRefresher::spawn(transport.clone(), cache, page_rx, settings());

        run_for(Duration::from_secs(721)).await;
        assert_eq!(transport.count("GET", REFRESH), 0);

        page_tx.send_replace(PageState::new("/login", true));
        run_for(Duration::from_secs(720)).await;
        assert_eq!(transport.count("GET", REFRESH), 0);

        page_tx.send_replace(PageState::new("/admin/overview", true));
        run_for(Duration::from_secs(720)).await;
        assert_eq!(transport.count("GET", REFRESH), 1);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn success_invalidates_session_and_failure_is_swallowed() {
        let transport = Arc::new(FakeTransport::new());
        let cache = Arc::new(QueryCache::default());
        session::SessionService::new(transport.as_ref(), cache.as_ref()).me().await.expect("session");
        let (_page_tx, page_rx) = watch::channel(PageState::new("/admin", true));

        let handle = SessionRefresher::spawn(transport.clone(), cache.clone(), page_rx, settings());

        run_for(Duration::from_secs(721)).await;
        assert!(cache.get::<AdminSession>(&session::key()).is_none());

        transport.set_refresh_status(500);
        run_for(Duration::from_secs(720)).await;
        assert_eq!(transport.count("GET", REFRESH), 2);
        assert!(!handle.is_finished());

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_stop_the_loop() {
        let transport = Arc::new(FakeTransport::new());
        let cache = Arc::new(QueryCache::default());
        let (_page_tx, page_rx) = watch::channel(PageState::new("/admin/projects", true));

        let handle = SessionRefresher::spawn(transport.clone(), cache.clone(), page_rx.clone(), settings());
        handle.cancel().await;

        let dropped = SessionRefresher::spawn(transport.clone(), cache, page_rx, settings());
        drop(dropped);

        run_for(Duration::from_secs(3 * 720)).await;
        assert_eq!(transport.count("GET", REFRESH), 0);
    }
}
