use serde::{Deserialize, Serialize};

use crate::crypto::Address;
use crate::error::CoreError;
use crate::serialize::amount_str;
use crate::types::dec::Dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// A staking validator as seen at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Operator identity
    pub operator: Address,
    pub status: BondStatus,
    /// Tokens held by the validator, smallest unit
    #[serde(with = "amount_str")]
    pub tokens: u128,
    /// Total shares issued to delegators
    pub delegator_shares: Dec,
}

impl Validator {
    pub fn new_bonded(operator: Address, tokens: u128, delegator_shares: Dec) -> Self {
        Validator {
            operator,
            status: BondStatus::Bonded,
            tokens,
            delegator_shares,
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    /// Tokens counted as bonded: the full token total for bonded
    /// validators, zero otherwise
    pub fn bonded_tokens(&self) -> u128 {
        if self.is_bonded() {
            self.tokens
        } else {
            0
        }
    }
}

/// Shares held by a delegator with one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    pub shares: Dec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingEntry {
    pub creation_height: u64,
    /// Unix seconds at which the balance is released
    pub completion_time: u64,
    #[serde(with = "amount_str")]
    pub initial_balance: u128,
    /// Tokens still pending withdrawal (already token units, not shares)
    #[serde(with = "amount_str")]
    pub balance: u128,
}

/// Pending withdrawals from one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegation {
    pub delegator: Address,
    pub validator: Address,
    pub entries: Vec<UnbondingEntry>,
}

impl UnbondingDelegation {
    /// Sum of pending entry balances
    pub fn total_balance(&self) -> Result<u128, CoreError> {
        self.entries.iter().try_fold(0u128, |acc, entry| {
            acc.checked_add(entry.balance).ok_or(CoreError::Overflow)
        })
    }
}
