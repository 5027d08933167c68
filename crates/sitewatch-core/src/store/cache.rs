// ── Resource cache ──
//
// Holds the single authoritative copy of the sites collection. Reads
// are cheap snapshot clones; every state transition is broadcast to
// subscribers through a `watch` channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sitewatch_api::SiteGateway;

use super::fetch::{FetchHandle, FetchOutcome, SharedFetch};
use crate::convert::sites_from_records;
use crate::error::CoreError;
use crate::model::{Site, SiteId};
use crate::notify::{Notification, NotificationSink};
use crate::stream::CacheStream;

/// Cache identity of the sites collection.
pub const SITES_CACHE_KEY: &str = "sites";

/// Load state of the cache, as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Point-in-time view of the cache.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    /// Collection in server order. Kept across failed fetches.
    pub sites: Arc<Vec<Arc<Site>>>,
    pub load_state: LoadState,
    /// Message of the last failed fetch, cleared by the next applied one.
    pub error: Option<String>,
    /// Generation of the fetch whose data is shown; 0 before the first load.
    pub generation: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Set by `invalidate()`, cleared when fresh data lands.
    pub stale: bool,
}

impl CacheSnapshot {
    /// Whether any fetch has ever been applied.
    pub fn loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    pub fn site(&self, id: &SiteId) -> Option<Arc<Site>> {
        self.sites.iter().find(|s| s.id == *id).cloned()
    }

    /// How long ago the shown data was fetched, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.fetched_at.map(|t| Utc::now() - t)
    }
}

#[derive(Debug, Clone, Copy)]
enum FetchReason {
    Initial,
    Invalidate,
    Refetch,
}

impl FetchReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Invalidate => "invalidate",
            Self::Refetch => "refetch",
        }
    }
}

struct InFlight {
    generation: u64,
    future: SharedFetch,
}

/// Generation bookkeeping. Guarded by one lock so issuing a fetch and
/// deciding whether a result is still current never interleave.
#[derive(Default)]
struct FetchSlot {
    /// Last generation token handed out.
    issued: u64,
    in_flight: Option<InFlight>,
}

// ── ResourceCache ────────────────────────────────────────────────

/// Single in-memory copy of the remote sites collection.
///
/// Cheaply cloneable; every clone shares the same state. Fetches are
/// spawned onto the current Tokio runtime, so the fetching methods must
/// be called from within one.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    key: &'static str,
    gateway: Arc<dyn SiteGateway>,
    notifier: Arc<dyn NotificationSink>,
    state: watch::Sender<CacheSnapshot>,
    slot: Mutex<FetchSlot>,
    cancel: CancellationToken,
}

impl ResourceCache {
    pub fn new(gateway: Arc<dyn SiteGateway>, notifier: Arc<dyn NotificationSink>) -> Self {
        let (state, _) = watch::channel(CacheSnapshot::default());
        Self {
            inner: Arc::new(CacheInner {
                key: SITES_CACHE_KEY,
                gateway,
                notifier,
                state,
                slot: Mutex::new(FetchSlot::default()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn key(&self) -> &'static str {
        self.inner.key
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Current collection and load state.
    ///
    /// The very first call issues the initial fetch; later calls never
    /// touch the gateway.
    pub fn get(&self) -> CacheSnapshot {
        let never_fetched = self.inner.lock_slot().issued == 0;
        if never_fetched {
            drop(self.issue(FetchReason::Initial));
        }
        self.snapshot()
    }

    /// Current state without side effects.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Ensure data is loaded.
    ///
    /// Joins the in-flight fetch if there is one, resolves immediately if
    /// data is already present, and otherwise issues a fetch.
    pub fn load(&self) -> FetchHandle {
        {
            let slot = self.inner.lock_slot();
            if let Some(f) = &slot.in_flight {
                debug!(key = self.inner.key, generation = f.generation, "joining in-flight fetch");
                return FetchHandle::new(f.generation, f.future.clone());
            }
            let snap = self.inner.state.borrow();
            if snap.loaded() && snap.load_state == LoadState::Idle {
                return FetchHandle::ready(FetchOutcome::Applied {
                    generation: snap.generation,
                    count: snap.sites.len(),
                });
            }
        }
        self.issue(FetchReason::Initial)
    }

    /// Subscribe to every state transition.
    pub fn subscribe(&self) -> CacheStream {
        CacheStream::new(self.inner.state.subscribe())
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Mark the data stale and re-fetch in the background.
    ///
    /// Always issues a new generation: a fetch already in flight may have
    /// started before the write that caused this invalidation.
    pub fn invalidate(&self) -> FetchHandle {
        self.issue(FetchReason::Invalidate)
    }

    /// Re-fetch now, for user-initiated refreshes.
    pub fn refetch(&self) -> FetchHandle {
        self.issue(FetchReason::Refetch)
    }

    /// Stop applying results. Fetches resolving afterwards are detached.
    pub fn close(&self) {
        self.inner.cancel.cancel();
        self.inner.lock_slot().in_flight = None;
        debug!(key = self.inner.key, "cache closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Fetch issuance ───────────────────────────────────────────

    fn issue(&self, reason: FetchReason) -> FetchHandle {
        let mut slot = self.inner.lock_slot();

        if self.inner.cancel.is_cancelled() {
            return FetchHandle::ready(FetchOutcome::Detached {
                generation: slot.issued,
            });
        }

        if let (FetchReason::Initial, Some(f)) = (reason, &slot.in_flight) {
            return FetchHandle::new(f.generation, f.future.clone());
        }

        slot.issued += 1;
        let generation = slot.issued;

        let inner = Arc::clone(&self.inner);
        let future = async move { inner.run_fetch(generation).await }
            .boxed()
            .shared();

        if let Some(prev) = slot.in_flight.replace(InFlight {
            generation,
            future: future.clone(),
        }) {
            debug!(
                key = self.inner.key,
                superseded = prev.generation,
                generation,
                "newer fetch issued over in-flight one"
            );
        }

        self.inner.state.send_modify(|s| {
            s.load_state = LoadState::Loading;
            if matches!(reason, FetchReason::Invalidate) {
                s.stale = true;
            }
        });
        drop(slot);

        debug!(
            key = self.inner.key,
            generation,
            reason = reason.as_str(),
            backend = self.inner.gateway.backend_tag(),
            "fetch issued"
        );

        tokio::spawn(future.clone());
        FetchHandle::new(generation, future)
    }
}

impl CacheInner {
    fn lock_slot(&self) -> MutexGuard<'_, FetchSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_fetch(self: Arc<Self>, generation: u64) -> FetchOutcome {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            res = self.gateway.list_sites() => Some(
                res.map_err(CoreError::from).and_then(sites_from_records),
            ),
        };
        self.complete(generation, result)
    }

    /// Apply a fetch result if, and only if, it is still the latest issued.
    fn complete(&self, generation: u64, result: Option<Result<Vec<Site>, CoreError>>) -> FetchOutcome {
        let mut slot = self.lock_slot();
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            slot.in_flight = None;
        }

        let Some(result) = result.filter(|_| !self.cancel.is_cancelled()) else {
            debug!(key = self.key, generation, "fetch result detached");
            return FetchOutcome::Detached { generation };
        };

        if generation != slot.issued {
            debug!(
                key = self.key,
                generation,
                latest = slot.issued,
                "discarding superseded fetch result"
            );
            return FetchOutcome::Superseded { generation };
        }

        match result {
            Ok(sites) => {
                let count = sites.len();
                let sites: Vec<Arc<Site>> = sites.into_iter().map(Arc::new).collect();
                self.state.send_modify(|s| {
                    s.sites = Arc::new(sites);
                    s.load_state = LoadState::Idle;
                    s.error = None;
                    s.generation = generation;
                    s.fetched_at = Some(Utc::now());
                    s.stale = false;
                });
                drop(slot);
                debug!(key = self.key, generation, count, "fetch applied");
                FetchOutcome::Applied { generation, count }
            }
            Err(error) => {
                self.state.send_modify(|s| {
                    s.load_state = LoadState::Error;
                    s.error = Some(error.to_string());
                });
                drop(slot);
                warn!(key = self.key, generation, error = %error, "fetch failed; keeping last known data");
                self.notifier
                    .notify(Notification::error("Unable to load sites. Please try again."));
                FetchOutcome::Failed { generation, error }
            }
        }
    }
}
