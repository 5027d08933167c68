// The remote collection seam.

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{CreateSite, SiteRecord};

/// Narrow interface to the remote "sites" resource.
///
/// Implementations must be cheap to share behind an `Arc`; the core
/// crate holds exactly one per dashboard and calls it from spawned tasks.
#[async_trait]
pub trait SiteGateway: Send + Sync {
    /// Short tag for logs (`"http"`, `"fake"`, ...).
    fn backend_tag(&self) -> &'static str;

    /// Fetch the full collection, in server order.
    async fn list_sites(&self) -> Result<Vec<SiteRecord>, Error>;

    /// Create a site; the server assigns its identity.
    async fn create_site(&self, input: &CreateSite) -> Result<SiteRecord, Error>;

    /// Delete a site. Fails with [`Error::NotFound`] when it is already gone.
    async fn delete_site(&self, id: &str) -> Result<(), Error>;

    /// Overwrite a site's lifecycle status.
    async fn update_site_status(&self, id: &str, status: &str) -> Result<SiteRecord, Error>;
}
