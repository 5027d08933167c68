// ── Dashboard facade ──
//
// Owns the one resource cache and the one mutation coordinator of a
// session, and hands out views over them. Consumers are injected with a
// `Dashboard` instead of reaching for ambient state.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use sitewatch_api::{HttpGateway, SiteGateway};

use crate::config::DashboardConfig;
use crate::confirm::Confirmation;
use crate::error::CoreError;
use crate::mutation::{MutationCoordinator, MutationOutcome, SiteCommand};
use crate::notify::NotificationSink;
use crate::store::{CacheSnapshot, FetchHandle, ResourceCache};
use crate::stream::SiteFilter;
use crate::view::SitesView;

/// Entry point for every consumer of the sites collection.
///
/// Cheaply cloneable; every clone shares the same cache.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    cache: ResourceCache,
    coordinator: MutationCoordinator,
    notifier: Arc<dyn NotificationSink>,
}

impl Dashboard {
    /// Build a dashboard talking HTTP to `config.api_url`.
    pub fn new(config: &DashboardConfig, notifier: Arc<dyn NotificationSink>) -> Result<Self, CoreError> {
        let gateway = HttpGateway::new(
            config.api_url.as_str(),
            config.api_key.as_ref(),
            &config.transport(),
        )?;
        Ok(Self::with_gateway(Arc::new(gateway), notifier))
    }

    /// Build a dashboard over any gateway implementation.
    pub fn with_gateway(gateway: Arc<dyn SiteGateway>, notifier: Arc<dyn NotificationSink>) -> Self {
        debug!(backend = gateway.backend_tag(), "building dashboard");
        let cache = ResourceCache::new(Arc::clone(&gateway), Arc::clone(&notifier));
        let coordinator = MutationCoordinator::new(gateway, cache.clone(), Arc::clone(&notifier));
        Self {
            inner: Arc::new(DashboardInner {
                cache,
                coordinator,
                notifier,
            }),
        }
    }

    /// One-shot: build, run `f`, close.
    ///
    /// Used by CLI commands that need a single request/response cycle.
    pub async fn oneshot<F, Fut, T>(
        config: &DashboardConfig,
        notifier: Arc<dyn NotificationSink>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let dashboard = Self::new(config, notifier)?;
        let result = f(dashboard.clone()).await;
        dashboard.close();
        result
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Current cache state; the first call starts loading.
    pub fn sites(&self) -> CacheSnapshot {
        self.inner.cache.get()
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.inner.cache
    }

    /// A live view with its own filter state.
    pub fn view(&self, filter: SiteFilter) -> SitesView {
        let _ = self.inner.cache.get();
        SitesView::new(
            self.inner.cache.subscribe(),
            self.inner.coordinator.pending().clone(),
            filter,
        )
    }

    // ── Writes ───────────────────────────────────────────────────

    /// User-initiated refresh.
    pub fn refresh(&self) -> FetchHandle {
        self.inner.cache.refetch()
    }

    pub async fn execute(
        &self,
        command: SiteCommand,
        confirm: &dyn Confirmation,
    ) -> Result<MutationOutcome, CoreError> {
        self.inner.coordinator.execute(command, confirm).await
    }

    pub fn coordinator(&self) -> &MutationCoordinator {
        &self.inner.coordinator
    }

    pub fn notifier(&self) -> &Arc<dyn NotificationSink> {
        &self.inner.notifier
    }

    /// Stop applying fetch results. Views see no further transitions.
    pub fn close(&self) {
        self.inner.cache.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use crate::model::SiteId;
    use crate::notify::TracingSink;
    use crate::store::FetchOutcome;
    use crate::testing::{FakeGateway, paris_and_lyon};

    fn dashboard() -> (Dashboard, Arc<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::with_records(paris_and_lyon()));
        (
            Dashboard::with_gateway(gateway.clone(), Arc::new(TracingSink)),
            gateway,
        )
    }

    #[tokio::test]
    async fn clones_share_one_cache() {
        let (a, gateway) = dashboard();
        let b = a.clone();

        let _ = a.sites();
        let _ = b.sites();
        b.cache().load().wait().await;

        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.sites().sites.len(), 2);
    }

    #[tokio::test]
    async fn declined_delete_leaves_everything_untouched() {
        let (dash, gateway) = dashboard();
        dash.cache().load().wait().await;

        let outcome = dash
            .execute(SiteCommand::Delete { id: SiteId::new("1") }, &NeverConfirm)
            .await
            .unwrap();

        assert!(matches!(outcome, MutationOutcome::Declined));
        assert_eq!(gateway.delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(dash.sites().sites.len(), 2);
    }

    #[tokio::test]
    async fn close_detaches_in_flight_refresh() {
        let (dash, _) = dashboard();
        dash.cache().load().wait().await;

        let handle = dash.refresh();
        dash.close();
        assert!(matches!(handle.wait().await, FetchOutcome::Detached { .. }));
        assert!(dash.cache().is_closed());
    }

    #[tokio::test]
    async fn delete_then_refresh_never_shows_the_id() {
        let (dash, _) = dashboard();
        dash.cache().load().wait().await;

        dash.execute(SiteCommand::Delete { id: SiteId::new("1") }, &AlwaysConfirm)
            .await
            .unwrap()
            .settled()
            .await;
        dash.refresh().wait().await;

        assert!(dash.sites().site(&SiteId::new("1")).is_none());
    }

    #[tokio::test]
    async fn oneshot_closes_after_the_closure() {
        let config = DashboardConfig::new("http://127.0.0.1:9/api".parse().unwrap());

        let kept = Dashboard::oneshot(&config, Arc::new(TracingSink), |dash| async move {
            assert!(!dash.cache().is_closed());
            Ok(dash)
        })
        .await
        .unwrap();

        assert!(kept.cache().is_closed());
    }
}
