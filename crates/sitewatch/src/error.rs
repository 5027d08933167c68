//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sitewatch_config::ConfigError;
use sitewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote ───────────────────────────────────────────────────────
    #[error("Could not load sites: {message}")]
    #[diagnostic(
        code(sitewatch::fetch_failed),
        help(
            "Check that the API is reachable and retry with: sitewatch sites refresh\n\
             Use --insecure (-k) for self-signed certificates."
        )
    )]
    Fetch { message: String },

    #[error("Authentication failed")]
    #[diagnostic(
        code(sitewatch::auth_failed),
        help(
            "Verify the API key for profile '{profile}'.\n\
             Store a new one with: sitewatch config set-key"
        )
    )]
    AuthFailed { profile: String },

    #[error("Site '{identifier}' not found")]
    #[diagnostic(
        code(sitewatch::not_found),
        help("Run: sitewatch sites list to see available sites")
    )]
    NotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitewatch::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sitewatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sitewatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sitewatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API endpoint configured")]
    #[diagnostic(
        code(sitewatch::no_config),
        help(
            "Create a profile with: sitewatch config init\n\
             Or pass --api-url / set SITEWATCH_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sitewatch::config))]
    Config { message: String },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(sitewatch::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => CliError::Validation {
                field,
                reason: message,
            },
            CoreError::NotFound { id } => CliError::NotFound { identifier: id },
            CoreError::Fetch { message } => CliError::Fetch { message },
            CoreError::Unauthorized => CliError::AuthFailed {
                profile: "current".into(),
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
