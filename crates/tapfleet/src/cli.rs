//! Clap derive structures for the `tapfleet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends on clap alone so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tapfleet -- inspect and bulk-configure ports across a TAP switch fleet
#[derive(Debug, Parser)]
#[command(
    name = "tapfleet",
    version,
    about = "Inspect and bulk-configure ports across a fleet of TAP switches",
    long_about = "Lists devices and ports from the local device store, edits single ports,\n\
        and applies one configuration patch to many ports at once, across devices.",
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
    /// Config file (defaults to the platform config path)
    #[arg(long, env = "TAPFLEET_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the device store (overrides config)
    #[arg(long, env = "TAPFLEET_STORE_PATH", global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Store slot key; the file is <DIR>/<KEY>.json
    #[arg(long, env = "TAPFLEET_STORE_KEY", global = true)]
    pub key: Option<String>,

    /// Output format (defaults to the config file's choice, then table)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

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

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Inspect devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Inspect and edit ports on one device
    #[command(alias = "p")]
    Ports(PortsArgs),

    /// Apply one configuration patch to many ports
    #[command(alias = "b")]
    Batch(BatchArgs),

    /// Fleet-wide statistics
    Stats,

    /// Manage the stored device collection
    Store(StoreArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show device details
    Get {
        /// Device ID or name
        device: String,
    },

    /// Port and power utilization for one device
    Summary {
        /// Device ID or name
        device: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// List the ports of a device
    #[command(alias = "ls")]
    List {
        /// Device ID or name
        device: String,

        /// Only connected ports
        #[arg(long)]
        connected: bool,

        /// Only ports with PoE enabled
        #[arg(long)]
        poe: bool,
    },

    /// Show one port's configuration
    Get {
        /// Device ID or name
        device: String,

        /// Port number
        port: u32,

        /// Include fields that do not apply to the port's current mode
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Edit one port
    Set {
        /// Device ID or name
        device: String,

        /// Port number
        port: u32,

        /// Load a JSON patch first; field flags are applied on top
        #[arg(long, short = 'F', value_name = "FILE")]
        from_file: Option<PathBuf>,

        #[command(flatten)]
        fields: PortFieldArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(subcommand)]
    pub command: BatchCommand,
}

#[derive(Debug, Subcommand)]
pub enum BatchCommand {
    /// Merge a patch into every selected port
    Apply {
        /// Ports to patch, as DEVICE:PORTS (e.g. switch-002:1,3,5-8). Repeatable.
        #[arg(long = "select", short = 's', value_name = "DEVICE:PORTS", required = true)]
        select: Vec<String>,

        /// Load a JSON patch first; field flags are applied on top
        #[arg(long, short = 'F', value_name = "FILE")]
        from_file: Option<PathBuf>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        fields: PortFieldArgs,
    },
}

// ── Port field flags ────────────────────────────────────────────────

/// One flag per patchable port field. Absent flags leave the field alone.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_field_names)]
pub struct PortFieldArgs {
    /// Port name
    #[arg(long)]
    pub name: Option<String>,

    /// Link status
    #[arg(long, value_parser = ["connected", "disconnected"])]
    pub status: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Enable or disable PoE
    #[arg(long, value_name = "BOOL")]
    pub poe_enabled: Option<bool>,

    /// Access VLAN (1-4094)
    #[arg(long)]
    pub vlan_id: Option<u32>,

    /// VLAN mode
    #[arg(long, value_parser = ["access", "trunk", "hybrid"])]
    pub vlan_mode: Option<String>,

    /// Allowed VLANs on a trunk, e.g. 1,10-20,30
    #[arg(long, value_name = "LIST")]
    pub allowed_vlans: Option<String>,

    /// Native VLAN (1-4094)
    #[arg(long)]
    pub native_vlan: Option<u32>,

    /// Link speed
    #[arg(long, value_parser = ["auto", "10M", "100M", "1G", "10G"])]
    pub speed: Option<String>,

    /// Interface type
    #[arg(long, value_parser = ["layer2", "layer3"])]
    pub interface_type: Option<String>,

    /// PoE priority
    #[arg(long, value_parser = ["low", "high", "critical"])]
    pub poe_priority: Option<String>,

    /// PoE power budget in watts (0-90)
    #[arg(long, value_name = "WATTS")]
    pub poe_max_power: Option<f64>,

    /// PoE standard
    #[arg(long, value_parser = ["auto", "ieee802.3af", "ieee802.3at", "ieee802.3bt"])]
    pub poe_type: Option<String>,

    /// Flow control
    #[arg(long, value_name = "BOOL")]
    pub flow_control: Option<bool>,

    /// Storm control
    #[arg(long, value_name = "BOOL")]
    pub storm_control: Option<bool>,

    /// Broadcast storm threshold, percent (0-100)
    #[arg(long, value_name = "PCT")]
    pub broadcast_threshold: Option<u32>,

    /// Multicast storm threshold, percent (0-100)
    #[arg(long, value_name = "PCT")]
    pub multicast_threshold: Option<u32>,

    /// MTU in bytes (64-9216)
    #[arg(long)]
    pub mtu: Option<u32>,

    /// Loop detection
    #[arg(long, value_name = "BOOL")]
    pub loop_detection: Option<bool>,

    /// Remove an optional field from the port (e.g. --clear description). Repeatable.
    #[arg(long = "clear", value_name = "FIELD")]
    pub clear: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STORE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Print the store file location
    Path,

    /// Discard all edits and restore the seed devices
    Reset,

    /// Print the stored device collection as JSON
    Export,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file, prompting for the store location
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
