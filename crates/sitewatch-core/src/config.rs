// ── Runtime connection configuration ──
//
// Describes how to reach the sites API. Carries the credential but never
// touches disk; the CLI builds a `DashboardConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use sitewatch_api::TransportConfig;

/// Configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the sites API (e.g. `https://ops.example.com/api/`).
    pub api_url: Url,
    /// Bearer token; omitted from requests when `None`.
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    /// Skip TLS verification (self-signed staging hosts).
    pub accept_invalid_certs: bool,
}

impl DashboardConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            api_key: None,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            ..TransportConfig::default()
        }
    }
}
