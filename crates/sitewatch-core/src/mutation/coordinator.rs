// ── Mutation coordinator ──
//
// Executes create / delete / associate against the gateway and turns the
// outcome into a cache invalidation plus a user-facing notification.

use std::sync::Arc;

use tracing::{debug, info, warn};

use sitewatch_api::{CreateSite, SiteGateway, SiteRecord};

use super::pending::PendingTracker;
use super::{MutationOutcome, SiteCommand};
use crate::confirm::Confirmation;
use crate::error::CoreError;
use crate::model::{NewSite, Site, SiteId, SiteStatus};
use crate::notify::{Notification, NotificationSink};
use crate::store::ResourceCache;

/// Funnel for every write to the sites collection.
///
/// Cheaply cloneable; clones share the pending set.
#[derive(Clone)]
pub struct MutationCoordinator {
    gateway: Arc<dyn SiteGateway>,
    cache: ResourceCache,
    notifier: Arc<dyn NotificationSink>,
    pending: PendingTracker,
}

impl MutationCoordinator {
    pub fn new(
        gateway: Arc<dyn SiteGateway>,
        cache: ResourceCache,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            cache,
            notifier,
            pending: PendingTracker::new(),
        }
    }

    pub fn pending(&self) -> &PendingTracker {
        &self.pending
    }

    pub fn is_pending(&self, id: &SiteId) -> bool {
        self.pending.is_pending(id)
    }

    /// Route a command to its operation. Only `Delete` consults `confirm`.
    pub async fn execute(
        &self,
        command: SiteCommand,
        confirm: &dyn Confirmation,
    ) -> Result<MutationOutcome, CoreError> {
        debug!(command = command.verb(), target = ?command.target(), "executing command");
        match command {
            SiteCommand::Create(input) => self.create(input).await,
            SiteCommand::Delete { id } => self.delete(&id, confirm).await,
            SiteCommand::Associate { id } => self.associate(&id).await,
        }
    }

    // ── Create ───────────────────────────────────────────────────

    /// Validate, then create remotely. The new site shows up only via the
    /// re-fetch, never by inserting it locally.
    pub async fn create(&self, input: NewSite) -> Result<MutationOutcome, CoreError> {
        let input = match input.validate() {
            Ok(input) => input,
            Err(err) => {
                if let CoreError::Validation { message, .. } = &err {
                    self.notifier.notify(Notification::error(message.clone()));
                }
                return Err(err);
            }
        };

        let _guard = self.pending.begin_create();
        let record = match self.gateway.create_site(&CreateSite::from(&input)).await {
            Ok(record) => record,
            Err(err) => return Err(self.failed("create", err.into())),
        };

        let refresh = self.cache.invalidate();
        info!(name = %input.name, id = %record.id, "site created");
        self.notifier
            .notify(Notification::success(format!("Site '{}' was created.", input.name)));

        Ok(MutationOutcome::Applied {
            site: confirmed_site(record),
            refresh,
        })
    }

    // ── Delete ───────────────────────────────────────────────────

    /// Ask for confirmation, then delete remotely.
    ///
    /// A declined prompt makes no gateway call. The row stays in the cache
    /// until the re-fetch confirms it is gone.
    pub async fn delete(
        &self,
        id: &SiteId,
        confirm: &dyn Confirmation,
    ) -> Result<MutationOutcome, CoreError> {
        let cached = self.cache.snapshot().site(id);
        let prompt = match &cached {
            Some(site) => format!("Delete site '{}'?", site.name),
            None => format!("Delete site {id}?"),
        };

        if !confirm.confirm(&prompt).await {
            debug!(%id, "delete declined");
            return Ok(MutationOutcome::Declined);
        }

        let guard = self.pending.begin(id);
        let result = self.gateway.delete_site(id.as_str()).await;
        drop(guard);

        match result {
            Ok(()) => {
                let refresh = self.cache.invalidate();
                info!(%id, "site deleted");
                self.notifier
                    .notify(Notification::success("The site was deleted."));
                Ok(MutationOutcome::Applied {
                    site: cached.map(|s| (*s).clone()),
                    refresh,
                })
            }
            Err(err) if err.is_not_found() => {
                // Someone else removed it; the re-fetch drops the stale row.
                drop(self.cache.invalidate());
                warn!(%id, "delete target no longer exists");
                self.notifier
                    .notify(Notification::error("The site no longer exists."));
                Err(CoreError::NotFound { id: id.to_string() })
            }
            Err(err) => Err(self.failed("delete", err.into())),
        }
    }

    // ── Associate ────────────────────────────────────────────────

    /// Transition a pending candidate to online.
    ///
    /// Any other status is a no-op: no gateway call, no invalidation.
    pub async fn associate(&self, id: &SiteId) -> Result<MutationOutcome, CoreError> {
        let mut snapshot = self.cache.snapshot();
        if !snapshot.loaded() {
            self.cache.load().wait().await;
            snapshot = self.cache.snapshot();
        }

        let Some(site) = snapshot.site(id) else {
            warn!(%id, "associate target not in the collection");
            self.notifier
                .notify(Notification::error("The site no longer exists."));
            return Err(CoreError::NotFound { id: id.to_string() });
        };
        if !site.status.is_pending() {
            debug!(%id, status = %site.status, "associate skipped");
            return Ok(MutationOutcome::Skipped {
                reason: format!("site '{}' is {}, not pending", site.name, site.status),
            });
        }

        let guard = self.pending.begin(id);
        let result = self
            .gateway
            .update_site_status(id.as_str(), SiteStatus::Online.as_ref())
            .await;
        drop(guard);

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                if err.is_not_found() {
                    drop(self.cache.invalidate());
                }
                return Err(self.failed("associate", err.into()));
            }
        };

        let refresh = self.cache.invalidate();
        info!(%id, name = %site.name, "site associated");
        self.notifier
            .notify(Notification::success("The site was associated."));

        Ok(MutationOutcome::Applied {
            site: confirmed_site(record),
            refresh,
        })
    }

    fn failed(&self, action: &str, err: CoreError) -> CoreError {
        warn!(action, error = %err, "mutation failed");
        self.notifier.notify(Notification::error(format!(
            "Unable to {action} the site. Please try again. ({err})"
        )));
        err
    }
}

/// The server's copy of a record it already accepted.
///
/// The write stands even if the reply does not convert; the re-fetch
/// decides what the collection holds.
fn confirmed_site(record: SiteRecord) -> Option<Site> {
    match Site::try_from(record) {
        Ok(site) => Some(site),
        Err(err) => {
            warn!(error = %err, "write confirmed but the returned record is unusable");
            None
        }
    }
}
