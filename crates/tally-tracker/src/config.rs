use serde::{Deserialize, Serialize};

/// Holders exported per denomination
pub const MAX_RANKING_ENTRIES: usize = 1000;

/// Unbonding delegations read per account
pub const DEFAULT_UNBONDING_LIMIT: u16 = 100;

/// Smallest-unit scale of one whole asset unit
pub const MICRO_UNIT: u64 = 1_000_000;

/// Configuration for a tracking run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Ranking length per denomination
    pub max_entries: usize,
    /// Unbonding delegations read per account
    pub unbonding_limit: u16,
    /// Per-denomination floor an account must reach in at least one
    /// whitelisted denomination
    pub min_unit: u64,
    /// Key prefix of the vesting supply artifact
    pub vesting_prefix: String,
    /// Key prefix of the ranking artifacts
    pub ranking_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_entries: MAX_RANKING_ENTRIES,
            unbonding_limit: DEFAULT_UNBONDING_LIMIT,
            min_unit: MICRO_UNIT,
            vesting_prefix: "vesting".to_string(),
            ranking_prefix: "tracking".to_string(),
        }
    }
}
