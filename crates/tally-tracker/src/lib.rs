//! Tally Tracker - Holdings snapshot engine
//!
//! This crate computes per-account effective balances (liquid coins plus
//! staked and unbonding value), filters them against per-denomination
//! floors, ranks the top holders of each whitelisted denomination and
//! exports the rankings together with the vesting-locked supply.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod job;
pub mod ranking;
pub mod rates;

pub use aggregate::{
    compute_effective_balance, AccountBalance, Aggregation, AggregationStats, BalanceAggregator,
};
pub use config::{TrackerConfig, DEFAULT_UNBONDING_LIMIT, MAX_RANKING_ENTRIES, MICRO_UNIT};
pub use error::TrackerError;
pub use export::{rfc3339, ExportReport, ExportedArtifact, SnapshotExporter};
pub use filter::ThresholdFilter;
pub use job::{TrackingJob, TrackingReport};
pub use ranking::{select_top_k, RankEntry};
pub use rates::ExchangeRateTable;
