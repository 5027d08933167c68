// sitewatch-core: Client-side synchronization layer for the sites collection.
//
// One `ResourceCache` holds the collection, a `MutationCoordinator`
// funnels every write, and `SitesView` projects filtered frames. The
// `Dashboard` facade wires them together over a `SiteGateway`.

pub mod config;
pub mod confirm;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod store;
pub mod stream;
pub mod view;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use confirm::{AlwaysConfirm, Confirmation, NeverConfirm};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use model::{NewSite, Site, SiteId, SiteStatus};
pub use mutation::{MutationCoordinator, MutationOutcome, PendingTracker, SiteCommand};
pub use notify::{BroadcastSink, Notification, NotificationSink, TracingSink, Variant};
pub use store::{CacheSnapshot, FetchHandle, FetchOutcome, LoadState, ResourceCache};
pub use stream::{CacheStream, SiteFilter, StatusFilter};
pub use view::{SiteRow, SitesView, ViewBody, ViewFrame};
