use std::collections::BTreeMap;

use tally_core::{Address, CoreError, Dec, Delegation, Validator};
use tracing::{debug, warn};

use crate::error::TrackerError;

/// Share-to-token conversion rate per validator, built once per run.
///
/// Validators without delegator shares have no rate; delegations against
/// them convert to nothing.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateTable {
    rates: BTreeMap<Address, Dec>,
    skipped: usize,
}

impl ExchangeRateTable {
    /// `rate = bonded_tokens / delegator_shares` for every validator with
    /// shares
    pub fn build(validators: &[Validator]) -> Result<Self, TrackerError> {
        let mut table = ExchangeRateTable::default();

        for validator in validators {
            if validator.delegator_shares.is_zero() {
                warn!(
                    "Validator {} has no delegator shares (tokens {}); delegations to it count as zero",
                    validator.operator, validator.tokens
                );
                table.skipped += 1;
                continue;
            }

            let rate = Dec::ratio(validator.bonded_tokens(), validator.delegator_shares)?;
            table.rates.insert(validator.operator, rate);
        }

        debug!(
            "Built exchange rate table: {} rates, {} skipped",
            table.rates.len(),
            table.skipped
        );
        Ok(table)
    }

    pub fn rate(&self, validator: &Address) -> Option<Dec> {
        self.rates.get(validator).copied()
    }

    /// Token value of a delegation, `None` when its validator has no rate
    pub fn token_amount(&self, delegation: &Delegation) -> Result<Option<u128>, CoreError> {
        self.rate(&delegation.validator)
            .map(|rate| delegation.shares.mul_truncate(rate))
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Validators left out for lack of shares
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
