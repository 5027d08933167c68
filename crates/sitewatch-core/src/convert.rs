// ── Wire → domain conversion ──
//
// Gateway records carry status as a free string; the domain model only
// admits the four known values. A record with anything else is rejected
// rather than silently coerced.

use std::collections::HashSet;

use sitewatch_api::{CreateSite, SiteRecord};

use crate::error::CoreError;
use crate::model::{NewSite, Site, SiteId, SiteStatus};

impl TryFrom<SiteRecord> for Site {
    type Error = CoreError;

    fn try_from(rec: SiteRecord) -> Result<Self, Self::Error> {
        let status: SiteStatus = rec.status.parse().map_err(|_| {
            CoreError::fetch(format!(
                "site {} has unknown status '{}'",
                rec.id, rec.status
            ))
        })?;

        Ok(Site {
            id: SiteId::from(rec.id),
            name: rec.name,
            address: rec.address,
            status,
        })
    }
}

impl From<&NewSite> for CreateSite {
    fn from(input: &NewSite) -> Self {
        CreateSite {
            name: input.name.clone(),
            address: input.address.clone(),
        }
    }
}

/// Convert a whole listing, failing on the first invalid record.
///
/// Ids must be unique within the listing.
pub(crate) fn sites_from_records(records: Vec<SiteRecord>) -> Result<Vec<Site>, CoreError> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .map(|rec| {
            let site = Site::try_from(rec)?;
            if !seen.insert(site.id.clone()) {
                return Err(CoreError::fetch(format!("duplicate site id {}", site.id)));
            }
            Ok(site)
        })
        .collect()
}
