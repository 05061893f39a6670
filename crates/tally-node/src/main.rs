use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod node;
mod sample;

use cli::{Cli, Commands};
use config::{generate_sample_config, NodeConfig};
use node::Tracker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .pretty()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let tracker = Tracker::new(load_config(&config)?)?;
            tracker.run().await?;
        }
        Commands::Once { config } => {
            let tracker = Tracker::new(load_config(&config)?)?;
            let report = tracker.run_once().await?;
            if !report.is_complete() {
                return Err(anyhow::anyhow!(
                    "{} artifacts were not written",
                    report.failures().count()
                ));
            }
        }
        Commands::Init {
            output,
            ledger,
            accounts,
            seed,
        } => {
            init_config(output, ledger, accounts, seed)?;
        }
    }

    Ok(())
}

fn load_config(config_path: &Path) -> Result<NodeConfig> {
    info!("Loading configuration from {:?}", config_path);

    if !config_path.exists() {
        error!(
            "Configuration file not found: {:?}. Run 'tally init' to create one.",
            config_path
        );
        return Err(anyhow::anyhow!("Configuration file not found"));
    }
    NodeConfig::load(config_path)
}

/// Write a sample configuration and the ledger it points at
fn init_config(output: PathBuf, ledger_path: PathBuf, accounts: usize, seed: u64) -> Result<()> {
    info!("Generating sample ledger with {} accounts", accounts);

    let block_time = chrono::Utc::now().timestamp().max(0) as u64;
    let ledger = sample::generate_sample_ledger(accounts, seed, block_time)?;
    ledger.save(&ledger_path)?;
    info!("Ledger saved to {:?}", ledger_path);

    let config = generate_sample_config(&ledger_path);
    config.save(&output)?;
    info!("Configuration saved to {:?}", output);

    println!("\nConfiguration file created: {}", output.display());
    println!("Sample ledger created: {}", ledger_path.display());
    println!("\nTo take one snapshot, run:");
    println!("  tally once --config {}", output.display());
    println!("To run on a schedule, run:");
    println!("  tally run --config {}", output.display());

    Ok(())
}
