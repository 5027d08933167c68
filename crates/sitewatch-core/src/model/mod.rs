// ── Domain model ──
//
// Canonical representation of the sites collection. Wire records from
// sitewatch-api are converted into these types in `convert`.

pub mod site;
pub mod site_id;

pub use site::{NewSite, Site, SiteStatus};
pub use site_id::SiteId;
