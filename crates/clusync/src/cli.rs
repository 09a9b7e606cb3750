//! Clap derive structures for the `clusync` CLI.
//!
//! Kept free of workspace crates so `build.rs` can compile it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clusync -- copy storage cluster configuration between clusters
#[derive(Debug, Parser)]
#[command(
    name = "clusync",
    version,
    about = "Export a storage cluster's configuration and replay it onto another cluster",
    long_about = "Export NFS exports, SMB shares, quotas, local users and cluster settings\n\
        from a primary cluster into JSON snapshot files, then replay them onto a\n\
        secondary cluster. Every change is confirmed interactively unless\n\
        --auto-approve is given.",
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
    /// Approve every change without prompting
    #[arg(long, short = 'a', env = "CLUSYNC_AUTO_APPROVE", global = true)]
    pub auto_approve: bool,

    /// Directory holding the snapshot files
    #[arg(long, short = 'd', global = true, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Credentials file with primary / secondary / ldap / ad entries
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Audit log file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// How often live state is re-read while reconciling
    #[arg(long, global = true)]
    pub live_state: Option<LiveStateArg>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Accept self-signed TLS certificates (the default)
    #[arg(long, short = 'k', global = true, conflicts_with = "verify_tls")]
    pub insecure: bool,

    /// Verify the cluster's TLS certificate
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CLUSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LiveStateArg {
    /// Re-read the cluster before every item
    PerItem,
    /// Read shared listings once per resource kind
    PerBatch,
}

/// A group of resource kinds. Applied in the order listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// NFS exports (nfs.json)
    Nfs,
    /// SMB shares and global SMB settings (smb.json)
    Smb,
    /// Directory quotas (quotas.json)
    Quotas,
    /// Local users (users.json)
    Users,
    /// Time, network, LDAP, AD, identity mappings, snapshot policies
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Primary,
    Secondary,
    Ldap,
    Ad,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the primary cluster and write snapshot files
    #[command(alias = "list")]
    Dump(KindsArgs),

    /// Replay snapshot files onto the secondary cluster
    #[command(alias = "set")]
    Apply(KindsArgs),

    /// Inspect configuration and store passwords
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct KindsArgs {
    /// Resource kinds to process (repeatable; default: all)
    #[arg(long = "kind", short = 'K', value_name = "KIND")]
    pub kinds: Vec<KindArg>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Store a password in the system keyring
    StorePassword {
        /// Whose password
        role: RoleArg,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
