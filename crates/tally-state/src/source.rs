use tally_core::{Account, Address, Delegation, UnbondingDelegation, Validator};

use crate::error::StateError;

/// Iteration over every ledger account
pub trait AccountSource {
    /// Block time (unix seconds) the snapshot was taken at
    fn block_time(&self) -> u64;

    /// Visit every account exactly once in a stable order. The visitor
    /// returns `true` to stop early.
    fn iterate_accounts(
        &self,
        visit: &mut dyn FnMut(&Account) -> bool,
    ) -> Result<(), StateError>;
}

/// Read access to staking state
pub trait StakingSource {
    fn all_validators(&self) -> Result<Vec<Validator>, StateError>;

    fn delegations_of(&self, delegator: &Address) -> Result<Vec<Delegation>, StateError>;

    /// At most `limit` unbonding delegations of `delegator`
    fn unbonding_delegations_of(
        &self,
        delegator: &Address,
        limit: u16,
    ) -> Result<Vec<UnbondingDelegation>, StateError>;

    /// Denomination staked tokens are counted in
    fn bond_denom(&self) -> Result<String, StateError>;
}

/// Assets eligible for threshold checks and ranking
pub trait WhitelistSource {
    fn whitelisted_denoms(&self) -> Result<Vec<String>, StateError>;
}
