use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tally_tracker::TrackerConfig;

/// Seconds between scheduled snapshots
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Ledger snapshot file (`.json`, anything else is read as bincode)
    pub ledger_path: PathBuf,

    /// Directory artifacts are written to
    pub output_dir: PathBuf,

    /// Seconds between runs in `tally run`
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Engine settings
    #[serde(flatten)]
    pub tracker: TrackerConfig,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            ledger_path: PathBuf::from("./tally-data/ledger.json"),
            output_dir: PathBuf::from("/tmp"),
            interval_secs: DEFAULT_INTERVAL_SECS,
            tracker: TrackerConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NodeConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            anyhow::bail!("interval_secs must be positive");
        }
        if self.tracker.min_unit == 0 {
            anyhow::bail!("min_unit must be positive");
        }
        if self.tracker.max_entries == 0 {
            anyhow::bail!("max_entries must be positive");
        }
        if self.tracker.vesting_prefix.is_empty() || self.tracker.ranking_prefix.is_empty() {
            anyhow::bail!("artifact prefixes must not be empty");
        }
        Ok(())
    }

    pub fn to_tracker_config(&self) -> TrackerConfig {
        self.tracker.clone()
    }
}

/// Generate a sample configuration pointing at `ledger_path`
pub fn generate_sample_config(ledger_path: &Path) -> NodeConfig {
    let data_dir = ledger_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    NodeConfig {
        ledger_path: ledger_path.to_path_buf(),
        output_dir: data_dir.join("artifacts"),
        ..Default::default()
    }
}
