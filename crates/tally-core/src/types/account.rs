use serde::{Deserialize, Serialize};

use crate::crypto::Address;
use crate::types::coin::Coins;
use crate::types::vesting::VestingSchedule;

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    /// Liquid balances per denomination
    pub coins: Coins,
    /// Set for vesting accounts
    #[serde(default)]
    pub vesting: Option<VestingSchedule>,
}

impl Account {
    pub fn new(address: Address, coins: Coins) -> Self {
        Account {
            address,
            coins,
            vesting: None,
        }
    }

    pub fn with_vesting(mut self, schedule: VestingSchedule) -> Self {
        self.vesting = Some(schedule);
        self
    }

    pub fn is_vesting(&self) -> bool {
        self.vesting.is_some()
    }

    /// Coins still locked at `time`; empty for plain accounts
    pub fn vesting_coins(&self, time: u64) -> Coins {
        self.vesting
            .as_ref()
            .map(|schedule| schedule.vesting_coins(time))
            .unwrap_or_default()
    }
}
