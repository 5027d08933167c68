//! Clap derive structures for the `sitewatch` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitewatch -- keep an eye on monitored customer sites
#[derive(Debug, Parser)]
#[command(
    name = "sitewatch",
    version,
    about = "Inspect and manage monitored sites from the command line",
    long_about = "Lists, creates, deletes, and associates monitored sites through the\n\
        operations dashboard API. Every listing goes through the same cache the\n\
        live `watch` view uses, so what you see is what the server confirmed.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "SITEWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Base URL of the sites API (overrides profile)
    #[arg(long, short = 'u', env = "SITEWATCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "SITEWATCH_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SITEWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SITEWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SITEWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Status filter accepted by `list` and `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Online,
    Offline,
    Warning,
    /// Detected candidates awaiting association (shown as "New")
    Pending,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and manage monitored sites
    #[command(alias = "s")]
    Sites(SitesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

/// Search and status filter shared by `list` and `watch`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Case-insensitive match on name or address
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Only show sites with this status
    #[arg(long, default_value = "all")]
    pub status: StatusArg,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List sites matching a filter
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Live view that re-renders on every change (Ctrl-C to stop)
    Watch {
        #[command(flatten)]
        filter: FilterArgs,

        /// Background refresh interval in seconds (0 = never)
        #[arg(long, short = 'n', default_value = "30")]
        interval: u64,
    },

    /// Create a new site
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Physical address
        #[arg(long)]
        address: String,
    },

    /// Delete a site (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Site id
        id: String,
    },

    /// Confirm a pending candidate, moving it online
    Associate {
        /// Site id
        id: String,
    },

    /// Re-fetch the collection from the server
    Refresh,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's API key in the system keyring
    SetKey {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
