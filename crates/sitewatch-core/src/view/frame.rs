// ── View frames ──

use std::sync::Arc;

use serde::Serialize;

use crate::model::Site;
use crate::mutation::PendingTracker;
use crate::store::{CacheSnapshot, LoadState};
use crate::stream::SiteFilter;

/// Placeholder rows shown while the first load is running.
pub const LOADING_PLACEHOLDERS: usize = 6;

/// Sites matching `filter`, in collection order.
pub fn project(sites: &[Arc<Site>], filter: &SiteFilter) -> Vec<Arc<Site>> {
    sites
        .iter()
        .filter(|site| filter.matches(site))
        .cloned()
        .collect()
}

/// One rendered row and the controls it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRow {
    #[serde(flatten)]
    pub site: Arc<Site>,
    /// A mutation targeting this row is in flight.
    pub busy: bool,
    pub can_delete: bool,
    pub can_associate: bool,
}

impl SiteRow {
    fn new(site: Arc<Site>, busy: bool) -> Self {
        let pending = site.status.is_pending();
        Self {
            can_delete: !pending && !busy,
            can_associate: pending && !busy,
            site,
            busy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    /// First load in progress; nothing to show yet.
    Loading { placeholders: usize },
    /// Loaded, but nothing matches (or the collection is empty).
    Empty,
    Rows(Vec<SiteRow>),
}

/// Everything a surface needs to draw the sites list once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFrame {
    pub body: ViewBody,
    /// Non-blocking error indicator shown next to the body.
    pub error: Option<String>,
    /// A background re-fetch is running over already-shown data.
    pub refreshing: bool,
    /// Size of the unfiltered collection.
    pub total: usize,
}

impl ViewFrame {
    pub fn rows(&self) -> &[SiteRow] {
        match &self.body {
            ViewBody::Rows(rows) => rows,
            ViewBody::Loading { .. } | ViewBody::Empty => &[],
        }
    }
}

/// Derive a frame from the three upstream slices. Pure.
pub fn build_frame(
    snapshot: &CacheSnapshot,
    filter: &SiteFilter,
    pending: &PendingTracker,
) -> ViewFrame {
    let error = match snapshot.load_state {
        LoadState::Error => snapshot.error.clone(),
        LoadState::Idle | LoadState::Loading => None,
    };

    let body = if snapshot.loaded() {
        let rows: Vec<SiteRow> = project(&snapshot.sites, filter)
            .into_iter()
            .map(|site| {
                let busy = pending.is_pending(&site.id);
                SiteRow::new(site, busy)
            })
            .collect();
        if rows.is_empty() {
            ViewBody::Empty
        } else {
            ViewBody::Rows(rows)
        }
    } else if snapshot.load_state == LoadState::Error {
        ViewBody::Empty
    } else {
        ViewBody::Loading {
            placeholders: LOADING_PLACEHOLDERS,
        }
    };

    ViewFrame {
        body,
        error,
        refreshing: snapshot.loaded() && snapshot.load_state == LoadState::Loading,
        total: snapshot.sites.len(),
    }
}
