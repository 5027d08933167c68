// ── Filter predicates for the sites view ──
//
// Applied to cache snapshots without re-querying the gateway.

use std::fmt;
use std::str::FromStr;

use crate::model::{Site, SiteStatus};

/// Status-equality half of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SiteStatus),
}

impl StatusFilter {
    pub fn matches(self, status: SiteStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<SiteStatus>()
            .map(Self::Only)
            .map_err(|_| format!("unknown status '{s}' (expected all, online, offline, warning or pending)"))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Ephemeral filter state owned by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFilter {
    search: String,
    needle: String,
    pub status: StatusFilter,
}

impl SiteFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        let mut filter = Self {
            status,
            ..Self::default()
        };
        filter.set_search(search);
        filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.needle = self.search.to_lowercase();
    }

    /// Name or address contains the search term (case-insensitive) and
    /// the status filter admits the site's status.
    pub fn matches(&self, site: &Site) -> bool {
        self.status.matches(site.status)
            && (self.needle.is_empty()
                || site.name.to_lowercase().contains(&self.needle)
                || site.address.to_lowercase().contains(&self.needle))
    }
}
