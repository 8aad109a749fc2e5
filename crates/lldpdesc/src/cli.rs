//! Clap derive structures for the `lldpdesc` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lldpdesc -- keep Junos interface descriptions in step with LLDP
#[derive(Debug, Parser)]
#[command(
    name = "lldpdesc",
    version,
    about = "Record LLDP neighbors in Junos interface descriptions",
    long_about = "Tracks LLDP topology by writing each port's neighbor into its\n\
        interface description, and reports ports that come up, change\n\
        neighbor, or go down since the last run.\n\n\
        Talks to devices over the Junos REST API, or runs on-box via the\n\
        local `cli` binary.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "LLDPDESC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// How to reach devices (overrides profile)
    #[arg(long, short = 't', env = "LLDPDESC_TRANSPORT", global = true)]
    pub transport: Option<TransportArg>,

    /// Device username (overrides profile)
    #[arg(long, short = 'u', env = "LLDPDESC_USERNAME", global = true)]
    pub user: Option<String>,

    /// REST API port (overrides profile)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// REST API scheme (overrides profile)
    #[arg(long, global = true)]
    pub scheme: Option<SchemeArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LLDPDESC_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LLDPDESC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default from config, 30)
    #[arg(long, env = "LLDPDESC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// Junos REST API over HTTP(S)
    Rest,
    /// The `cli` binary on the device itself
    Local,
}

impl TransportArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Http,
    Https,
}

impl SchemeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

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
    /// Plain text, one line per event (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile LLDP neighbors into interface descriptions
    #[command(alias = "s")]
    Sync(SyncArgs),

    /// Show how an interface description decodes (offline)
    Decode(DecodeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYNC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Device hostnames or addresses
    #[arg(required = true, num_args = 1..)]
    pub devices: Vec<String>,

    /// Report changes without committing them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Devices processed in parallel (default from config, 4)
    #[arg(long, short = 'j')]
    pub concurrency: Option<usize>,

    /// Commit log comment
    #[arg(long, short = 'm')]
    pub comment: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DECODE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Interface description text
    #[arg(allow_hyphen_values = true)]
    pub text: String,
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

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (transport, scheme, port, username, password_env,
        /// insecure, ca_cert, timeout, cli_path)
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

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
