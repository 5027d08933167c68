// ── Site identity ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sitewatch_api::RecordId;

/// Opaque, immutable identifier of a site.
///
/// Servers may hand out numeric or string keys; both are normalized to
/// their textual form so lookups and URLs never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RecordId", into = "String")]
pub struct SiteId(String);

impl SiteId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SiteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<RecordId> for SiteId {
    fn from(id: RecordId) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SiteId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<SiteId> for String {
    fn from(id: SiteId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_normalize() {
        assert_eq!(SiteId::from(RecordId::Number(2)), SiteId::from("2"));
        assert_eq!(SiteId::from(RecordId::Text("x9".into())).as_str(), "x9");
    }

    #[test]
    fn deserializes_from_number_and_serializes_as_string() {
        let id: SiteId = serde_json::from_str("17").unwrap();
        assert_eq!(id.as_str(), "17");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
    }
}
