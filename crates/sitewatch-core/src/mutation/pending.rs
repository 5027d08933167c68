// ── In-flight mutation tracking ──
//
// Keyed by target site so an in-flight delete disables only its own row.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::SiteId;

/// Which sites have a mutation in flight, and how many creates are running.
///
/// Cloning shares the same underlying set. Every change bumps a version
/// counter observable through [`PendingTracker::subscribe`].
#[derive(Clone)]
pub struct PendingTracker {
    inner: Arc<PendingInner>,
}

struct PendingInner {
    by_id: DashMap<SiteId, usize>,
    creating: AtomicUsize,
    version: watch::Sender<u64>,
}

impl PendingTracker {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(PendingInner {
                by_id: DashMap::new(),
                creating: AtomicUsize::new(0),
                version,
            }),
        }
    }

    /// Mark `id` busy until the returned guard is dropped.
    ///
    /// Nested calls for the same id are counted, not rejected.
    pub fn begin(&self, id: &SiteId) -> PendingGuard {
        *self.inner.by_id.entry(id.clone()).or_insert(0) += 1;
        self.inner.bump();
        PendingGuard {
            inner: Arc::clone(&self.inner),
            target: Some(id.clone()),
        }
    }

    /// Count one create in flight until the returned guard is dropped.
    pub fn begin_create(&self) -> PendingGuard {
        self.inner.creating.fetch_add(1, Ordering::AcqRel);
        self.inner.bump();
        PendingGuard {
            inner: Arc::clone(&self.inner),
            target: None,
        }
    }

    pub fn is_pending(&self, id: &SiteId) -> bool {
        self.inner.by_id.contains_key(id)
    }

    /// Ids with at least one mutation in flight, sorted.
    pub fn pending_ids(&self) -> Vec<SiteId> {
        let mut ids: Vec<SiteId> = self.inner.by_id.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Number of creates in flight.
    pub fn creating(&self) -> usize {
        self.inner.creating.load(Ordering::Acquire)
    }

    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    /// Receiver that wakes on every change to the pending set.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }
}

impl Default for PendingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingInner {
    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

/// Releases one pending mark on drop.
#[must_use = "the mark is released as soon as the guard is dropped"]
pub struct PendingGuard {
    inner: Arc<PendingInner>,
    target: Option<SiteId>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        match &self.target {
            Some(id) => {
                self.inner.by_id.remove_if_mut(id, |_, count| {
                    *count = count.saturating_sub(1);
                    *count == 0
                });
            }
            None => {
                self.inner.creating.fetch_sub(1, Ordering::AcqRel);
            }
        }
        self.inner.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_per_id() {
        let tracker = PendingTracker::new();
        let a = SiteId::new("1");
        let b = SiteId::new("2");

        let guard = tracker.begin(&a);
        assert!(tracker.is_pending(&a));
        assert!(!tracker.is_pending(&b));

        drop(guard);
        assert!(!tracker.is_pending(&a));
        assert!(tracker.pending_ids().is_empty());
    }

    #[test]
    fn repeated_marks_are_counted() {
        let tracker = PendingTracker::new();
        let id = SiteId::new("7");

        let first = tracker.begin(&id);
        let second = tracker.begin(&id);
        drop(first);
        assert!(tracker.is_pending(&id));
        drop(second);
        assert!(!tracker.is_pending(&id));
    }

    #[test]
    fn creates_are_counted_separately() {
        let tracker = PendingTracker::new();
        let before = tracker.version();

        let guard = tracker.begin_create();
        assert_eq!(tracker.creating(), 1);
        assert!(tracker.pending_ids().is_empty());
        drop(guard);

        assert_eq!(tracker.creating(), 0);
        assert_eq!(tracker.version(), before + 2);
    }
}
