// ── Core error types ──
//
// User-facing errors from sitewatch-core. Consumers never see HTTP
// status codes or JSON parse failures directly: the
// `From<sitewatch_api::Error>` impl folds them into this taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Client-side, pre-flight. Never reaches the gateway.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// The target no longer exists remotely.
    #[error("Site not found: {id}")]
    NotFound { id: String },

    /// Transport or server failure. Recovered by an explicit refresh.
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    #[error("Unauthorized: check the configured API key")]
    Unauthorized,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitewatch_api::Error> for CoreError {
    fn from(err: sitewatch_api::Error) -> Self {
        match err {
            sitewatch_api::Error::NotFound { id } => CoreError::NotFound { id },
            sitewatch_api::Error::Unauthorized => CoreError::Unauthorized,
            sitewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sitewatch_api::Error::Tls(message) | sitewatch_api::Error::Config(message) => {
                CoreError::Config { message }
            }
            sitewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::fetch(format!("unexpected response: {message}"))
            }
            other @ (sitewatch_api::Error::Transport(_) | sitewatch_api::Error::Api { .. }) => {
                CoreError::fetch(other.to_string())
            }
        }
    }
}
