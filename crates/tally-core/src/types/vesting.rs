use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::types::coin::Coins;

/// One step of a periodic schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingPeriod {
    /// Period length in seconds
    pub length: u64,
    /// Coins released when the period ends
    pub amount: Coins,
}

/// Time-based release of an account's originally locked coins.
///
/// Times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingSchedule {
    /// Linear release between `start_time` and `end_time`
    Continuous {
        original: Coins,
        start_time: u64,
        end_time: u64,
    },
    /// Everything released at once at `end_time`
    Delayed { original: Coins, end_time: u64 },
    /// Stepwise release, one period after another from `start_time`
    Periodic {
        original: Coins,
        start_time: u64,
        periods: Vec<VestingPeriod>,
    },
}

impl VestingSchedule {
    pub fn original(&self) -> &Coins {
        match self {
            VestingSchedule::Continuous { original, .. }
            | VestingSchedule::Delayed { original, .. }
            | VestingSchedule::Periodic { original, .. } => original,
        }
    }

    /// Coins still locked at `time`
    pub fn vesting_coins(&self, time: u64) -> Coins {
        match self {
            VestingSchedule::Continuous {
                original,
                start_time,
                end_time,
            } => {
                if time <= *start_time {
                    return original.clone();
                }
                if time >= *end_time {
                    return Coins::new();
                }

                let elapsed = U256::from(time - start_time);
                let total = U256::from(end_time - start_time);
                let mut locked = Coins::new();
                for (denom, amount) in original.iter() {
                    // vested <= amount, so the narrowing cannot truncate
                    let vested = (U256::from(amount) * elapsed / total).as_u128();
                    locked.insert_nonzero(denom, amount - vested);
                }
                locked
            }
            VestingSchedule::Delayed { original, end_time } => {
                if time < *end_time {
                    original.clone()
                } else {
                    Coins::new()
                }
            }
            VestingSchedule::Periodic {
                original,
                start_time,
                periods,
            } => {
                if time <= *start_time {
                    return original.clone();
                }

                let mut vested = Coins::new();
                let mut period_end = *start_time;
                for period in periods {
                    period_end = period_end.saturating_add(period.length);
                    if time < period_end {
                        break;
                    }
                    vested = vested.saturating_add(&period.amount);
                }
                original.saturating_sub(&vested)
            }
        }
    }
}
