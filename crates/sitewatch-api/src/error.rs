use thiserror::Error;

/// Top-level error type for the `sitewatch-api` crate.
///
/// Covers every failure mode of the remote sites collection: transport,
/// HTTP status, and payload decoding. `sitewatch-core` maps these into
/// its own taxonomy so consumers never see raw HTTP details.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Local client settings that cannot be sent (e.g. a malformed API key).
    #[error("Invalid client configuration: {0}")]
    Config(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// The API key was missing or rejected.
    #[error("Unauthorized: the API rejected the supplied credentials")]
    Unauthorized,

    /// The addressed site does not exist remotely.
    #[error("Site not found: {id}")]
    NotFound { id: String },

    /// Any other non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = Error::Api {
            status: 422,
            message: "bad payload".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_variants() {
        assert!(Error::NotFound { id: "7".into() }.is_not_found());
        assert!(
            Error::Api {
                status: 404,
                message: String::new()
            }
            .is_not_found()
        );
        assert!(!Error::Unauthorized.is_not_found());
    }
}
