pub mod account;
pub mod coin;
pub mod dec;
pub mod staking;
pub mod vesting;

pub use account::Account;
pub use coin::{Coin, Coins};
pub use dec::{Dec, DEC_PRECISION};
pub use staking::{BondStatus, Delegation, UnbondingDelegation, UnbondingEntry, Validator};
pub use vesting::{VestingPeriod, VestingSchedule};
