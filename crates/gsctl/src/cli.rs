//! Clap derive structures for the `gsctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gsctl -- manage Netgear GS305EP/GS308EP/GS316EP PoE switches
#[derive(Debug, Parser)]
#[command(
    name = "gsctl",
    version,
    about = "Inspect and configure Netgear PoE switches from the command line",
    long_about = "Drives the HTML web-admin of GS305EP(P), GS308EP(P) and GS316EP(P)\n\
        switches. Log in once per switch; the session token is stored and reused\n\
        until the switch expires it.",
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
    /// Output format [default: table]
    #[arg(long, short = 'o', env = "GSCTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Directory holding session tokens
    #[arg(long, env = "GSCTL_TOKEN_DIR", global = true)]
    pub token_dir: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "GSCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Switch model (e.g. GS308EP); skips detection at login
    #[arg(long, short = 'm', env = "GSCTL_MODEL", global = true)]
    pub model: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Markdown table
    Markdown,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to a switch and store the session token
    Login(LoginArgs),

    /// Detect the switch model
    Detect(AddressArgs),

    /// Port settings and link status
    Port(PortArgs),

    /// PoE settings, status and power cycling
    Poe(PoeArgs),

    /// Capture raw admin pages for troubleshooting
    DebugReport(AddressArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Switch IP address or host name
    #[arg(long, short = 'a', env = "GSCTL_ADDRESS")]
    pub address: String,
}

/// Optional port selection for read commands.
#[derive(Debug, Args)]
pub struct PortFilter {
    #[command(flatten)]
    pub target: AddressArgs,

    /// Ports to show, starting at 1 (repeat or comma-separate; default: all)
    #[arg(long = "port", short = 'p', value_delimiter = ',')]
    pub ports: Vec<u8>,
}

/// Required port selection for write commands.
#[derive(Debug, Args)]
pub struct PortSelection {
    #[command(flatten)]
    pub target: AddressArgs,

    /// Ports to change, starting at 1 (repeat or comma-separate)
    #[arg(long = "port", short = 'p', value_delimiter = ',', required = true)]
    pub ports: Vec<u8>,
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[command(flatten)]
    pub target: AddressArgs,

    /// Admin password (prompted when omitted)
    #[arg(long, env = "GSCTL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Port ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortArgs {
    #[command(subcommand)]
    pub command: PortCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortCommand {
    /// Show port settings
    Settings(PortFilter),

    /// Show link status
    Status(PortFilter),

    /// Change port settings
    Set(PortSetArgs),
}

#[derive(Debug, Args)]
pub struct PortSetArgs {
    #[command(flatten)]
    pub selection: PortSelection,

    /// Port name (max 16 characters; empty string clears it)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Speed: Auto, Disable, "10M half", "10M full", "100M half", "100M full"
    #[arg(long, short = 's')]
    pub speed: Option<String>,

    /// Ingress rate limit, e.g. "No Limit" or "8 Mbit/s"
    #[arg(long, short = 'i')]
    pub ingress_rate: Option<String>,

    /// Egress rate limit, e.g. "No Limit" or "8 Mbit/s"
    #[arg(long, short = 'e')]
    pub egress_rate: Option<String>,

    /// Flow control: On, Off
    #[arg(long, short = 'f')]
    pub flow_control: Option<String>,
}

// ── PoE ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PoeArgs {
    #[command(subcommand)]
    pub command: PoeCommand,
}

#[derive(Debug, Subcommand)]
pub enum PoeCommand {
    /// Show live PoE telemetry
    Status(PortFilter),

    /// Show PoE settings
    Settings(PortFilter),

    /// Change PoE settings
    Set(PoeSetArgs),

    /// Power-cycle PoE ports
    Cycle(PortSelection),
}

#[derive(Debug, Args)]
pub struct PoeSetArgs {
    #[command(flatten)]
    pub selection: PortSelection,

    /// Port power: enable or disable
    #[arg(long)]
    pub power: Option<String>,

    /// Power mode: 802.3af, legacy, pre-802.3at, 802.3at
    #[arg(long)]
    pub mode: Option<String>,

    /// Priority: low, high, critical
    #[arg(long)]
    pub priority: Option<String>,

    /// Limit type: none, class, user
    #[arg(long)]
    pub limit_type: Option<String>,

    /// Power limit in watts (3.0 up to the switch maximum)
    #[arg(long)]
    pub power_limit: Option<String>,

    /// Detection type: Legacy, "IEEE 802", "4pt 802.3af + Legacy"
    #[arg(long)]
    pub detection_type: Option<String>,

    /// Longer detection time: "Get Value Fault", disable, enable
    #[arg(long)]
    pub longer_detection: Option<String>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
