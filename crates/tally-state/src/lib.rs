//! Tally State - Ledger snapshot access and artifact sinks
//!
//! This crate provides the read capabilities the tracking engine consumes
//! (accounts, staking, whitelist), an in-memory ledger implementing them,
//! and the sinks artifacts are written to.

pub mod error;
pub mod ledger;
pub mod sink;
pub mod source;

pub use error::StateError;
pub use ledger::{LedgerSnapshot, LedgerState};
pub use sink::{ArtifactSink, FileSink, MemorySink};
pub use source::{AccountSource, StakingSource, WhitelistSource};
