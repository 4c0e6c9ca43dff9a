//! Clap derive structures for the `graphly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// graphly -- Microsoft 365 usage and licensing assessment
#[derive(Debug, Parser)]
#[command(
    name = "graphly",
    version,
    about = "Assess Microsoft 365 tenant usage and licensing from the command line",
    long_about = "Collects tenant usage metrics (Exchange, OneDrive, SharePoint, Teams,\n\
        licensing) via the Microsoft Graph API, derives growth and cost\n\
        projections, and renders an HTML + JSON assessment report.",
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
    /// Tenant profile to use
    #[arg(long, short = 'p', env = "GRAPHLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Entra tenant id (overrides profile)
    #[arg(long, env = "GRAPHLY_TENANT_ID", global = true)]
    pub tenant_id: Option<String>,

    /// App registration client id (overrides profile)
    #[arg(long, env = "GRAPHLY_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Client secret for the client-credentials flow
    #[arg(long, env = "GRAPHLY_CLIENT_SECRET", global = true, hide_env = true)]
    pub client_secret: Option<String>,

    /// Authentication flow (overrides profile)
    #[arg(long, value_enum, global = true)]
    pub auth: Option<AuthFlow>,

    /// Path to a corporate-proxy CA certificate (PEM)
    #[arg(long, env = "GRAPHLY_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GRAPHLY_OUTPUT",
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

    /// Request timeout in seconds (config default 30)
    #[arg(long, env = "GRAPHLY_TIMEOUT", global = true)]
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
    /// Plain text, one value per line (scripting)
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AuthFlow {
    /// OAuth2 client-credentials grant (unattended)
    ClientSecret,
    /// OAuth2 device-code grant (interactive sign-in)
    DeviceCode,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full assessment and write the report artifacts
    #[command(alias = "r")]
    Report(ReportArgs),

    /// Per-service storage usage totals
    #[command(alias = "u")]
    Usage(UsageArgs),

    /// Subscribed license SKUs with entitlement mapping
    #[command(alias = "lic")]
    Licenses(LicensesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Directory to write report.json / report.html / run.log into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Custom annual growth scenario rate, percent (>= -100; config default 30)
    #[arg(long, allow_negative_numbers = true)]
    pub growth_rate: Option<i32>,

    /// Trailing report window in days (7, 30, 90, or 180; config default 180)
    #[arg(long)]
    pub period_days: Option<u32>,

    /// Scope users and per-user records to members of this group
    #[arg(long)]
    pub group_filter: Option<String>,

    /// Skip the Teams/groups sub-analysis
    #[arg(long)]
    pub skip_teams: bool,

    /// Skip the planner sample
    #[arg(long)]
    pub skip_planner: bool,

    /// Write only report.json
    #[arg(long, conflicts_with = "html_only")]
    pub json_only: bool,

    /// Write only report.html
    #[arg(long)]
    pub html_only: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USAGE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsageArgs {
    /// Which service to query
    #[arg(value_enum, default_value = "summary")]
    pub service: UsageService,

    /// Trailing report window in days (7, 30, 90, or 180; config default 180)
    #[arg(long)]
    pub period_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UsageService {
    /// Exchange Online mailboxes
    Mailbox,
    /// OneDrive accounts
    Onedrive,
    /// SharePoint Online sites
    Sharepoint,
    /// All three services, one row each
    Summary,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LICENSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LicensesArgs {
    /// Include SKUs excluded from the licensed-user count
    #[arg(long)]
    pub all: bool,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g., "tenant_id", "client_id", "auth")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a client secret in the system keyring
    SetSecret {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
