// ── Reactive cache streams ──
//
// Subscription types for consuming cache transitions.

mod filter;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub use filter::{SiteFilter, StatusFilter};

use crate::store::CacheSnapshot;

/// A subscription to the resource cache.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct CacheStream {
    current: CacheSnapshot,
    receiver: watch::Receiver<CacheSnapshot>,
}

impl CacheStream {
    pub(crate) fn new(receiver: watch::Receiver<CacheSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot as of the last `changed()` (or creation).
    pub fn current(&self) -> &CacheSnapshot {
        &self.current
    }

    /// Latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> CacheSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next transition, returning the new snapshot.
    /// Returns `None` once the cache has been dropped.
    pub async fn changed(&mut self) -> Option<CacheSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> CacheWatchStream {
        CacheWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot per cache transition.
pub struct CacheWatchStream {
    inner: WatchStream<CacheSnapshot>,
}

impl Stream for CacheWatchStream {
    type Item = CacheSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
