use std::path::PathBuf;

use blotter_core::{EntityType, SyncAction};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "blotter")]
#[command(about = "Inspect and deliver the blotter offline sync queue")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name to read the remote API settings from
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Remote API base URL (overrides environment and profile)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or modify the local sync queue
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Run one delivery pass over the queue
    Sync,
    /// Deliver the queue whenever the remote API becomes reachable
    Watch {
        /// Seconds between connectivity probes
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// List pending queue items
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Queue a record snapshot read from a file or stdin
    Add {
        /// Entity type, e.g. REPORT or person-history
        entity: EntityType,
        /// Local mutation that produced the snapshot
        #[arg(long, default_value_t = SyncAction::Create)]
        action: SyncAction,
        /// JSON file holding the record (stdin when omitted)
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Try to deliver right away when the remote API is reachable
        #[arg(long)]
        deliver: bool,
    },
    /// Remove every queued item without delivering it
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the stored profiles and the effective settings
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
