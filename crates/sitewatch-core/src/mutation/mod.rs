// ── Mutation API ──
//
// All writes to the sites collection flow through `MutationCoordinator`.
// A successful write never touches the cache directly: it invalidates,
// and the re-fetch brings the confirmed server state in.

mod coordinator;
mod pending;

pub use coordinator::MutationCoordinator;
pub use pending::{PendingGuard, PendingTracker};

use crate::model::{NewSite, Site, SiteId};
use crate::store::FetchHandle;

/// Every write operation the dashboard can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteCommand {
    Create(NewSite),
    Delete { id: SiteId },
    /// Confirm a detected candidate: `pending -> online`.
    Associate { id: SiteId },
}

impl SiteCommand {
    /// Target id, if the command addresses an existing site.
    pub fn target(&self) -> Option<&SiteId> {
        match self {
            Self::Create(_) => None,
            Self::Delete { id } | Self::Associate { id } => Some(id),
        }
    }

    /// Short verb used in logs and notifications.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Delete { .. } => "delete",
            Self::Associate { .. } => "associate",
        }
    }
}

/// Result of a command that did not fail.
#[derive(Debug, Clone)]
pub enum MutationOutcome {
    /// The gateway confirmed the write and the cache was invalidated.
    ///
    /// `site` is the server's view of the record (create, associate) or
    /// the last cached copy (delete). `refresh` tracks the re-fetch.
    Applied {
        site: Option<Site>,
        refresh: FetchHandle,
    },
    /// The user declined the confirmation prompt.
    Declined,
    /// The command was a no-op for the target's current state.
    Skipped { reason: String },
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Wait for the post-mutation re-fetch, if there is one.
    pub async fn settled(self) -> Self {
        match self {
            Self::Applied { site, refresh } => {
                let outcome = refresh.clone().wait().await;
                tracing::debug!(generation = outcome.generation(), "post-mutation refresh settled");
                Self::Applied { site, refresh }
            }
            other => other,
        }
    }
}
