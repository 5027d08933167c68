//! CLI configuration: thin wrapper around `sitewatch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --api-key, --timeout, --insecure).

use std::time::Duration;

use secrecy::SecretString;

use sitewatch_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use sitewatch_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_api_key,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DashboardConfig` from the config file, profile, and flags.
///
/// Flags win over profile values. Without a matching profile, `--api-url`
/// alone is enough.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut dash = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            let mut profile = profile.clone();
            if let Some(ref url) = global.api_url {
                profile.api_url.clone_from(url);
            }
            sitewatch_config::profile_to_dashboard_config(&profile, &profile_name, &cfg.defaults)?
        }
        None if global.profile.is_some() => {
            return Err(sitewatch_config::ConfigError::ProfileNotFound {
                name: profile_name,
                available: cfg.profile_names(),
            }
            .into());
        }
        None => {
            let url = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            let mut dash = DashboardConfig::new(sitewatch_config::parse_api_url(url)?);
            dash.timeout = Duration::from_secs(cfg.defaults.timeout);
            dash.accept_invalid_certs = cfg.defaults.insecure;
            dash
        }
    };

    if let Some(ref key) = global.api_key {
        dash.api_key = Some(SecretString::from(key.clone()));
    }
    if let Some(secs) = global.timeout {
        dash.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        dash.accept_invalid_certs = true;
    }

    tracing::debug!(
        profile = %profile_name,
        api_url = %dash.api_url,
        authenticated = dash.api_key.is_some(),
        "resolved dashboard config"
    );
    Ok(dash)
}
