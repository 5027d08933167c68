// ── Fetch handles ──
//
// Every fetch the cache issues is a shared future: the cache drives it
// from a spawned task, and any number of callers may await the same
// outcome through a `FetchHandle` without triggering another request.

use std::fmt;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

use crate::error::CoreError;

pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// What happened to one issued fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The response was applied to the cache.
    Applied { generation: u64, count: usize },
    /// A newer fetch was issued before this one resolved; its result was dropped.
    Superseded { generation: u64 },
    /// The gateway failed; the cache kept its last known good data.
    Failed { generation: u64, error: CoreError },
    /// The cache was closed before the result arrived.
    Detached { generation: u64 },
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Applied { generation, .. }
            | Self::Superseded { generation }
            | Self::Failed { generation, .. }
            | Self::Detached { generation } => *generation,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Awaitable handle on an issued (or joined) fetch.
///
/// Dropping the handle does not cancel anything; the cache keeps
/// driving the fetch in the background.
#[derive(Clone)]
pub struct FetchHandle {
    generation: u64,
    future: SharedFetch,
}

impl FetchHandle {
    pub(crate) fn new(generation: u64, future: SharedFetch) -> Self {
        Self { generation, future }
    }

    /// A handle that is already resolved.
    pub(crate) fn ready(outcome: FetchOutcome) -> Self {
        let generation = outcome.generation();
        let future = futures_util::future::ready(outcome).boxed().shared();
        Self { generation, future }
    }

    /// Generation token of the fetch this handle tracks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the fetch to resolve.
    pub async fn wait(self) -> FetchOutcome {
        self.future.await
    }
}

impl fmt::Debug for FetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchHandle")
            .field("generation", &self.generation)
            .field("resolved", &self.future.peek().is_some())
            .finish()
    }
}
