use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tally_core::{
    Account, Address, BondStatus, Coin, Coins, Dec, Delegation, UnbondingDelegation,
    UnbondingEntry, Validator, VestingPeriod, VestingSchedule,
};
use tally_state::LedgerState;
use tally_tracker::MICRO_UNIT;

pub const SAMPLE_BOND_DENOM: &str = "uluna";
pub const SAMPLE_WHITELIST: [&str; 3] = ["ukrw", "uluna", "uusd"];

const VALIDATORS: u64 = 8;
const DAY: u64 = 86_400;

/// Build a deterministic ledger with staking and vesting activity, taken
/// at `block_time`
pub fn generate_sample_ledger(accounts: usize, seed: u64, block_time: u64) -> Result<LedgerState> {
    let mut rng = StdRng::seed_from_u64(seed);
    let whitelist = SAMPLE_WHITELIST.iter().map(|d| d.to_string()).collect();
    let mut ledger = LedgerState::new(SAMPLE_BOND_DENOM, whitelist, block_time);
    ledger.height = rng.gen_range(1_000_000..2_000_000);

    let mut validators = Vec::new();
    for i in 0..VALIDATORS {
        let operator = Address::derive(format!("validator-{}", i).as_bytes());
        let shares = rng.gen_range(10_000u128..1_000_000) * MICRO_UNIT as u128;
        // slashed validators hold fewer tokens than shares
        let tokens = shares - shares / rng.gen_range(10u128..1_000);
        let status = if i == VALIDATORS - 1 {
            BondStatus::Unbonding
        } else {
            BondStatus::Bonded
        };
        validators.push(operator);
        ledger.add_validator(Validator {
            operator,
            status,
            tokens,
            delegator_shares: Dec::from_int(shares)?,
        });
    }

    for i in 0..accounts {
        let address = Address::derive(format!("account-{}", i).as_bytes());
        let mut coins = Vec::new();
        for denom in SAMPLE_WHITELIST {
            if rng.gen_bool(0.6) {
                // log-uniform so some accounts fall below the floor
                let magnitude = rng.gen_range(0..12u32);
                coins.push(Coin::new(denom, rng.gen_range(1..10u128) * 10u128.pow(magnitude)));
            }
        }
        let mut account = Account::new(address, Coins::from_coins(coins)?);

        if rng.gen_bool(0.05) {
            account = account.with_vesting(sample_schedule(&mut rng, block_time));
        }
        ledger.insert_account(account);

        if rng.gen_bool(0.3) {
            for _ in 0..rng.gen_range(1..4) {
                let validator = validators[rng.gen_range(0..validators.len())];
                let shares = Dec::from_raw(rng.gen_range(1u128..1_000_000_000) * 10u128.pow(15));
                ledger.add_delegation(Delegation {
                    delegator: address,
                    validator,
                    shares,
                });
            }
        }

        if rng.gen_bool(0.1) {
            let validator = validators[rng.gen_range(0..validators.len())];
            let entries = (0..rng.gen_range(1..3))
                .map(|n| {
                    let initial = rng.gen_range(1..5_000u128) * MICRO_UNIT as u128;
                    UnbondingEntry {
                        creation_height: ledger.height - 1_000 * (n + 1),
                        completion_time: block_time + rng.gen_range(1..21) * DAY,
                        initial_balance: initial,
                        balance: initial - initial / 20,
                    }
                })
                .collect();
            ledger.add_unbonding_delegation(UnbondingDelegation {
                delegator: address,
                validator,
                entries,
            });
        }
    }

    Ok(ledger)
}

fn sample_schedule(rng: &mut StdRng, block_time: u64) -> VestingSchedule {
    let original = Coins::from_coins([Coin::new(
        SAMPLE_BOND_DENOM,
        rng.gen_range(1..100_000u128) * MICRO_UNIT as u128,
    )])
    .unwrap_or_default();
    let start_time = block_time.saturating_sub(rng.gen_range(0..365) * DAY);

    match rng.gen_range(0..3) {
        0 => VestingSchedule::Continuous {
            original,
            start_time,
            end_time: start_time + rng.gen_range(30..730) * DAY,
        },
        1 => VestingSchedule::Delayed {
            original,
            end_time: block_time + rng.gen_range(1..365) * DAY,
        },
        _ => {
            let steps = 4u128;
            let periods = original
                .iter()
                .map(|(denom, amount)| (denom.to_string(), amount / steps))
                .collect::<Vec<_>>();
            let periods = (0..steps)
                .map(|_| VestingPeriod {
                    length: 90 * DAY,
                    amount: Coins::from_coins(
                        periods.iter().map(|(d, a)| Coin::new(d.clone(), *a)),
                    )
                    .unwrap_or_default(),
                })
                .collect();
            VestingSchedule::Periodic {
                original,
                start_time,
                periods,
            }
        }
    }
}
