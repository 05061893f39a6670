use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - holdings tracking snapshots
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally tracking service and utilities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tracker on a fixed interval until interrupted
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },

    /// Take a single snapshot and exit
    Once {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },

    /// Initialize a configuration file and a sample ledger
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,

        /// Output path for the sample ledger snapshot
        #[arg(short, long, default_value = "tally-data/ledger.json")]
        ledger: PathBuf,

        /// Number of accounts in the sample ledger
        #[arg(long, default_value = "2000")]
        accounts: usize,

        /// Seed for the sample ledger
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}
