use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_core::{
    serialize, Account, Address, Delegation, UnbondingDelegation, Validator,
};
use tracing::{debug, info};

use crate::error::StateError;
use crate::source::{AccountSource, StakingSource, WhitelistSource};

/// Serialized form of a ledger snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub height: u64,
    /// Unix seconds
    pub block_time: u64,
    pub bond_denom: String,
    pub whitelist: Vec<String>,
    pub accounts: Vec<Account>,
    pub validators: Vec<Validator>,
    pub delegations: Vec<Delegation>,
    pub unbonding_delegations: Vec<UnbondingDelegation>,
}

/// In-memory, read-only view over a ledger snapshot.
///
/// Accounts are iterated in ascending address order.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub height: u64,
    pub block_time: u64,
    pub bond_denom: String,
    pub whitelist: Vec<String>,
    accounts: BTreeMap<Address, Account>,
    validators: Vec<Validator>,
    delegations: BTreeMap<Address, Vec<Delegation>>,
    unbonding: BTreeMap<Address, Vec<UnbondingDelegation>>,
}

impl LedgerState {
    pub fn new(bond_denom: impl Into<String>, whitelist: Vec<String>, block_time: u64) -> Self {
        LedgerState {
            bond_denom: bond_denom.into(),
            whitelist,
            block_time,
            ..Default::default()
        }
    }

    /// Index a snapshot; duplicate account addresses are rejected
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, StateError> {
        let mut state = LedgerState::new(snapshot.bond_denom, snapshot.whitelist, snapshot.block_time);
        state.height = snapshot.height;

        for account in snapshot.accounts {
            let address = account.address;
            if state.accounts.insert(address, account).is_some() {
                return Err(StateError::SnapshotLoad(format!(
                    "duplicate account {}",
                    address
                )));
            }
        }
        state.validators = snapshot.validators;
        for delegation in snapshot.delegations {
            state.add_delegation(delegation);
        }
        for unbonding in snapshot.unbonding_delegations {
            state.add_unbonding_delegation(unbonding);
        }

        debug!(
            "Indexed ledger at height {}: {} accounts, {} validators",
            state.height,
            state.accounts.len(),
            state.validators.len()
        );
        Ok(state)
    }

    /// Load a snapshot file: JSON for `.json`, bincode otherwise
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let bytes = fs::read(path)
            .map_err(|e| StateError::SnapshotLoad(format!("{}: {}", path.display(), e)))?;

        let snapshot: LedgerSnapshot = if is_json(path) {
            serialize::from_json_bytes(&bytes)?
        } else {
            serialize::from_bytes(&bytes)?
        };

        info!("Loaded ledger snapshot from {:?}", path);
        Self::from_snapshot(snapshot)
    }

    /// Write the snapshot back out in the format implied by the extension
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let snapshot = self.to_snapshot();
        let bytes = if is_json(path) {
            serialize::to_json_pretty(&snapshot)?
        } else {
            serialize::to_bytes(&snapshot)?
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::Sink(e.to_string()))?;
        }
        fs::write(path, bytes).map_err(|e| StateError::Sink(e.to_string()))?;
        Ok(())
    }

    pub fn to_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            height: self.height,
            block_time: self.block_time,
            bond_denom: self.bond_denom.clone(),
            whitelist: self.whitelist.clone(),
            accounts: self.accounts.values().cloned().collect(),
            validators: self.validators.clone(),
            delegations: self.delegations.values().flatten().cloned().collect(),
            unbonding_delegations: self.unbonding.values().flatten().cloned().collect(),
        }
    }

    /// Insert or replace an account
    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.address, account);
    }

    pub fn add_validator(&mut self, validator: Validator) {
        self.validators.push(validator);
    }

    pub fn add_delegation(&mut self, delegation: Delegation) {
        self.delegations
            .entry(delegation.delegator)
            .or_default()
            .push(delegation);
    }

    pub fn add_unbonding_delegation(&mut self, unbonding: UnbondingDelegation) {
        self.unbonding
            .entry(unbonding.delegator)
            .or_default()
            .push(unbonding);
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

impl AccountSource for LedgerState {
    fn block_time(&self) -> u64 {
        self.block_time
    }

    fn iterate_accounts(
        &self,
        visit: &mut dyn FnMut(&Account) -> bool,
    ) -> Result<(), StateError> {
        for account in self.accounts.values() {
            if visit(account) {
                break;
            }
        }
        Ok(())
    }
}

impl StakingSource for LedgerState {
    fn all_validators(&self) -> Result<Vec<Validator>, StateError> {
        Ok(self.validators.clone())
    }

    fn delegations_of(&self, delegator: &Address) -> Result<Vec<Delegation>, StateError> {
        Ok(self.delegations.get(delegator).cloned().unwrap_or_default())
    }

    fn unbonding_delegations_of(
        &self,
        delegator: &Address,
        limit: u16,
    ) -> Result<Vec<UnbondingDelegation>, StateError> {
        Ok(self
            .unbonding
            .get(delegator)
            .map(|list| list.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    fn bond_denom(&self) -> Result<String, StateError> {
        Ok(self.bond_denom.clone())
    }
}

impl WhitelistSource for LedgerState {
    fn whitelisted_denoms(&self) -> Result<Vec<String>, StateError> {
        Ok(self.whitelist.clone())
    }
}
