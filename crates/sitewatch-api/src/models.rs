// Wire models for the remote sites collection.
//
// These mirror the JSON payloads exactly. Status travels as a plain
// string; sitewatch-core validates it into its closed enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Site identifier as emitted by the server.
///
/// Some backends use numeric primary keys, others opaque strings. Both
/// are accepted and rendered identically in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A site record as returned by `GET /sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub status: String,
}

/// Body of `POST /sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSite {
    pub name: String,
    pub address: String,
}

/// Body of `PATCH /sites/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: String,
}
