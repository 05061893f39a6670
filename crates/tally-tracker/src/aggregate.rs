use tally_core::{Account, Address, CoreError, Coins};
use tally_state::{AccountSource, StakingSource};
use tracing::{debug, info};

use crate::error::TrackerError;
use crate::filter::ThresholdFilter;
use crate::rates::ExchangeRateTable;

/// Effective balance of one account; a transient overlay that is never
/// written back to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub address: Address,
    pub balance: Coins,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub accounts_visited: usize,
    pub accounts_retained: usize,
    pub vesting_accounts: usize,
    pub delegations_converted: usize,
    /// Delegations whose validator had no exchange rate
    pub delegations_without_rate: usize,
}

/// Output of one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Accounts admitted by the threshold filter, in ledger iteration order
    pub accounts: Vec<AccountBalance>,
    /// Coins still locked under vesting schedules, summed over all accounts
    pub vesting_supply: Coins,
    pub stats: AggregationStats,
}

/// Liquid coins plus staked and unbonding tokens in the bond denomination
pub fn compute_effective_balance(
    account: &Account,
    delegated: u128,
    unbonding: u128,
    bond_denom: &str,
) -> Result<Coins, CoreError> {
    let staked = delegated.checked_add(unbonding).ok_or(CoreError::Overflow)?;
    let mut balance = account.coins.clone();
    balance.add_amount(bond_denom, staked)?;
    Ok(balance)
}

/// Single pass over the ledger producing effective balances and the
/// vesting supply
pub struct BalanceAggregator<'a> {
    rates: &'a ExchangeRateTable,
    filter: &'a ThresholdFilter,
    bond_denom: &'a str,
    unbonding_limit: u16,
}

impl<'a> BalanceAggregator<'a> {
    pub fn new(
        rates: &'a ExchangeRateTable,
        filter: &'a ThresholdFilter,
        bond_denom: &'a str,
        unbonding_limit: u16,
    ) -> Self {
        BalanceAggregator {
            rates,
            filter,
            bond_denom,
            unbonding_limit,
        }
    }

    /// Visit every account once. Any ledger read failure or arithmetic
    /// overflow stops the iteration and fails the whole pass.
    pub fn aggregate<L>(&self, ledger: &L) -> Result<Aggregation, TrackerError>
    where
        L: AccountSource + StakingSource + ?Sized,
    {
        let block_time = ledger.block_time();
        let mut aggregation = Aggregation::default();
        let mut failure = None;

        ledger.iterate_accounts(&mut |account| {
            match self.visit(ledger, account, block_time, &mut aggregation) {
                Ok(()) => false,
                Err(e) => {
                    failure = Some(e);
                    true
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        info!(
            "Aggregated {} accounts, {} retained, vesting supply [{}]",
            aggregation.stats.accounts_visited,
            aggregation.stats.accounts_retained,
            aggregation.vesting_supply
        );
        Ok(aggregation)
    }

    fn visit<L>(
        &self,
        ledger: &L,
        account: &Account,
        block_time: u64,
        aggregation: &mut Aggregation,
    ) -> Result<(), TrackerError>
    where
        L: StakingSource + ?Sized,
    {
        aggregation.stats.accounts_visited += 1;

        if account.is_vesting() {
            aggregation.stats.vesting_accounts += 1;
            aggregation
                .vesting_supply
                .add_coins(&account.vesting_coins(block_time))?;
        }

        let delegated = self.delegated_amount(ledger, &account.address, &mut aggregation.stats)?;
        let unbonding = self.unbonding_amount(ledger, &account.address)?;
        let balance = compute_effective_balance(account, delegated, unbonding, self.bond_denom)?;

        if self.filter.admits(&balance) {
            aggregation.stats.accounts_retained += 1;
            aggregation.accounts.push(AccountBalance {
                address: account.address,
                balance,
            });
        }
        Ok(())
    }

    /// Sum of delegation values, each truncated before summing
    pub fn delegated_amount<L>(
        &self,
        ledger: &L,
        address: &Address,
        stats: &mut AggregationStats,
    ) -> Result<u128, TrackerError>
    where
        L: StakingSource + ?Sized,
    {
        let mut total: u128 = 0;
        for delegation in ledger.delegations_of(address)? {
            match self.rates.token_amount(&delegation)? {
                Some(amount) => {
                    stats.delegations_converted += 1;
                    total = total.checked_add(amount).ok_or(CoreError::Overflow)?;
                }
                None => {
                    stats.delegations_without_rate += 1;
                    debug!(
                        "Delegation from {} to {} has no exchange rate, counted as zero",
                        address, delegation.validator
                    );
                }
            }
        }
        Ok(total)
    }

    /// Sum of pending unbonding balances (token units)
    pub fn unbonding_amount<L>(&self, ledger: &L, address: &Address) -> Result<u128, TrackerError>
    where
        L: StakingSource + ?Sized,
    {
        let mut total: u128 = 0;
        for unbonding in ledger.unbonding_delegations_of(address, self.unbonding_limit)? {
            total = total
                .checked_add(unbonding.total_balance()?)
                .ok_or(CoreError::Overflow)?;
        }
        Ok(total)
    }
}
