// ── Sites view projection ──
//
// Derives what to render from (cache x filter x pending). Holds no
// collection of its own; every frame is recomputed from upstream.

mod frame;

pub use frame::{LOADING_PLACEHOLDERS, SiteRow, ViewBody, ViewFrame, build_frame, project};

use tokio::sync::watch;

use crate::mutation::PendingTracker;
use crate::stream::{CacheStream, SiteFilter, StatusFilter};

/// A live, filtered view over the resource cache.
///
/// Dropping the view unsubscribes it; nothing is delivered afterwards.
pub struct SitesView {
    cache: CacheStream,
    pending: PendingTracker,
    pending_rx: watch::Receiver<u64>,
    filter: SiteFilter,
}

impl SitesView {
    pub fn new(cache: CacheStream, pending: PendingTracker, filter: SiteFilter) -> Self {
        let pending_rx = pending.subscribe();
        Self {
            cache,
            pending,
            pending_rx,
            filter,
        }
    }

    pub fn filter(&self) -> &SiteFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: SiteFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Frame for the latest cache state.
    pub fn frame(&self) -> ViewFrame {
        build_frame(&self.cache.latest(), &self.filter, &self.pending)
    }

    /// Wait for the cache or the pending set to change, then recompute.
    ///
    /// Returns `None` once the cache is gone.
    pub async fn changed(&mut self) -> Option<ViewFrame> {
        tokio::select! {
            snap = self.cache.changed() => {
                snap?;
            }
            // The view holds a tracker clone, so this sender outlives us.
            _ = self.pending_rx.changed() => {}
        }
        Some(self.frame())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::confirm::AlwaysConfirm;
    use crate::model::{SiteId, SiteStatus};
    use crate::mutation::{MutationCoordinator, SiteCommand};
    use crate::notify::{NotificationSink, TracingSink};
    use crate::store::ResourceCache;
    use crate::testing::{FakeGateway, paris_and_lyon};

    fn row_ids(frame: &ViewFrame) -> Vec<(String, SiteStatus)> {
        match &frame.body {
            ViewBody::Rows(rows) => rows
                .iter()
                .map(|r| (r.site.id.to_string(), r.site.status))
                .collect(),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lyon_scenario() {
        let gateway = Arc::new(FakeGateway::with_records(paris_and_lyon()));
        let notifier: Arc<dyn NotificationSink> = Arc::new(TracingSink);
        let cache = ResourceCache::new(gateway.clone(), Arc::clone(&notifier));
        let coordinator = MutationCoordinator::new(gateway, cache.clone(), notifier);

        let mut view = SitesView::new(
            cache.subscribe(),
            coordinator.pending().clone(),
            SiteFilter::new("lyon", StatusFilter::All),
        );
        assert!(matches!(view.frame().body, ViewBody::Loading { placeholders: 6 }));

        cache.load().wait().await;
        let frame = view.frame();
        assert_eq!(row_ids(&frame), [("2".to_owned(), SiteStatus::Pending)]);
        let ViewBody::Rows(rows) = &frame.body else {
            unreachable!()
        };
        assert!(rows[0].can_associate);
        assert!(!rows[0].can_delete);

        coordinator
            .execute(
                SiteCommand::Associate { id: SiteId::new("2") },
                &AlwaysConfirm,
            )
            .await
            .unwrap()
            .settled()
            .await;

        let frame = view.changed().await.unwrap();
        assert!(!frame.refreshing);
        assert_eq!(row_ids(&frame), [("2".to_owned(), SiteStatus::Online)]);
    }

    #[tokio::test]
    async fn changed_wakes_on_cache_transitions() {
        let gateway = Arc::new(FakeGateway::with_records(paris_and_lyon()));
        let cache = ResourceCache::new(gateway, Arc::new(TracingSink));
        let mut view = SitesView::new(
            cache.subscribe(),
            PendingTracker::new(),
            SiteFilter::default(),
        );

        let handle = cache.refetch();
        let frame = view.changed().await.unwrap();
        assert!(matches!(frame.body, ViewBody::Loading { .. }));

        handle.wait().await;
        let frame = view.changed().await.unwrap();
        assert_eq!(row_ids(&frame).len(), 2);
        assert!(!frame.refreshing);
    }

    #[tokio::test]
    async fn filter_changes_apply_to_next_frame() {
        let gateway = Arc::new(FakeGateway::with_records(paris_and_lyon()));
        let cache = ResourceCache::new(gateway, Arc::new(TracingSink));
        cache.load().wait().await;

        let mut view = SitesView::new(
            cache.subscribe(),
            PendingTracker::new(),
            SiteFilter::default(),
        );
        view.set_status(StatusFilter::Only(SiteStatus::Warning));
        assert!(matches!(view.frame().body, ViewBody::Empty));

        view.set_status(StatusFilter::All);
        view.set_search("paris");
        assert_eq!(row_ids(&view.frame()), [("1".to_owned(), SiteStatus::Online)]);
    }
}
