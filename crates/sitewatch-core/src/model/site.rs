// ── Site domain type ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::site_id::SiteId;
use crate::error::CoreError;

/// Lifecycle status of a monitored site.
///
/// `Pending` marks a detected-but-unconfirmed candidate. The only
/// client-side transition is `Pending -> Online`, via association.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SiteStatus {
    Online,
    Offline,
    Warning,
    Pending,
}

impl SiteStatus {
    /// Human-facing badge text. Pending candidates read as "New".
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::Warning => "Warning",
            Self::Pending => "New",
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// One monitored customer location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub address: String,
    pub status: SiteStatus,
}

/// Input for creating a site. The server assigns the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSite {
    pub name: String,
    pub address: String,
}

impl NewSite {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Trim both fields and reject blanks, before anything hits the wire.
    pub fn validate(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_owned();
        let address = self.address.trim().to_owned();

        if name.is_empty() {
            return Err(CoreError::Validation {
                field: "name".into(),
                message: "Name is required.".into(),
            });
        }
        if address.is_empty() {
            return Err(CoreError::Validation {
                field: "address".into(),
                message: "Address is required.".into(),
            });
        }

        Ok(Self { name, address })
    }
}
