//! Tally Core - Ledger types, fixed-point arithmetic, and serialization
//!
//! This crate provides the foundational types shared by the tracking
//! engine: addresses, coin vectors, decimals, accounts, vesting schedules
//! and staking records.

pub mod crypto;
pub mod error;
pub mod serialize;
pub mod types;

pub use crypto::{hash_blake3, Address, Hash};
pub use error::CoreError;
pub use types::*;
