//! End-to-end tracking runs over in-memory ledgers

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tally_core::{
    Account, Address, Coin, Coins, Dec, Delegation, UnbondingDelegation, UnbondingEntry,
    Validator, VestingSchedule,
};
use tally_state::{
    AccountSource, ArtifactSink, FileSink, LedgerState, MemorySink, StakingSource, StateError,
    WhitelistSource,
};
use tally_tracker::{RankEntry, TrackerConfig, TrackerError, TrackingJob};

const STAKE: &str = "stake";

fn coins(pairs: &[(&str, u128)]) -> Coins {
    Coins::from_coins(pairs.iter().map(|(d, a)| Coin::new(*d, *a))).unwrap()
}

fn taken_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
}

fn read_ranking(sink: &MemorySink, key: &str) -> Vec<RankEntry> {
    let bytes = sink.read(key).unwrap().expect("ranking artifact");
    serde_json::from_slice(&bytes).unwrap()
}

fn unbonding(delegator: Address, validator: Address, balance: u128) -> UnbondingDelegation {
    UnbondingDelegation {
        delegator,
        validator,
        entries: vec![UnbondingEntry {
            creation_height: 10,
            completion_time: 5_000,
            initial_balance: balance,
            balance,
        }],
    }
}

/// Ledger wrapper whose staking reads fail for one account
struct FlakyLedger {
    inner: LedgerState,
    broken: Address,
}

impl AccountSource for FlakyLedger {
    fn block_time(&self) -> u64 {
        self.inner.block_time()
    }

    fn iterate_accounts(
        &self,
        visit: &mut dyn FnMut(&Account) -> bool,
    ) -> Result<(), StateError> {
        self.inner.iterate_accounts(visit)
    }
}

impl StakingSource for FlakyLedger {
    fn all_validators(&self) -> Result<Vec<Validator>, StateError> {
        self.inner.all_validators()
    }

    fn delegations_of(&self, delegator: &Address) -> Result<Vec<Delegation>, StateError> {
        if *delegator == self.broken {
            return Err(StateError::LedgerRead(format!("delegations of {}", delegator)));
        }
        self.inner.delegations_of(delegator)
    }

    fn unbonding_delegations_of(
        &self,
        delegator: &Address,
        limit: u16,
    ) -> Result<Vec<UnbondingDelegation>, StateError> {
        self.inner.unbonding_delegations_of(delegator, limit)
    }

    fn bond_denom(&self) -> Result<String, StateError> {
        self.inner.bond_denom()
    }
}

impl WhitelistSource for FlakyLedger {
    fn whitelisted_denoms(&self) -> Result<Vec<String>, StateError> {
        self.inner.whitelisted_denoms()
    }
}

/// Sink refusing every key that contains `needle`
struct PickySink {
    inner: MemorySink,
    needle: &'static str,
}

impl ArtifactSink for PickySink {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StateError> {
        if key.contains(self.needle) {
            return Err(StateError::Sink(format!("refused {}", key)));
        }
        self.inner.write(key, bytes)
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        self.inner.read(key)
    }
}

#[test]
fn test_effective_balance_with_staking_and_unbonding() {
    let v = Address::derive(b"V");
    let a = Address::derive(b"A");

    let mut ledger = LedgerState::new(STAKE, vec!["denomA".to_string(), STAKE.to_string()], 0);
    ledger.insert_account(Account::new(a, coins(&[("denomA", 5)])));
    ledger.add_validator(Validator::new_bonded(v, 100, Dec::from_int(50).unwrap()));
    ledger.add_delegation(Delegation {
        delegator: a,
        validator: v,
        shares: Dec::from_int(10).unwrap(),
    });
    ledger.add_unbonding_delegation(unbonding(a, v, 3));

    let config = TrackerConfig {
        min_unit: 1,
        ..Default::default()
    };
    let sink = Arc::new(MemorySink::new());
    let job = TrackingJob::new(config, sink.clone());

    let (aggregation, _) = job.aggregate(&ledger).unwrap();
    assert_eq!(aggregation.accounts.len(), 1);
    assert_eq!(
        aggregation.accounts[0].balance,
        coins(&[("denomA", 5), (STAKE, 23)])
    );
}

#[test]
fn test_floor_boundary() {
    let exact = Address::derive(b"exact");
    let short = Address::derive(b"short");

    let mut ledger = LedgerState::new(STAKE, vec!["denomA".to_string()], 0);
    ledger.insert_account(Account::new(exact, coins(&[("denomA", 1_000_000)])));
    ledger.insert_account(Account::new(short, coins(&[("denomA", 999_999)])));

    let job = TrackingJob::new(TrackerConfig::default(), Arc::new(MemorySink::new()));
    let (aggregation, _) = job.aggregate(&ledger).unwrap();

    let addresses: Vec<Address> = aggregation.accounts.iter().map(|a| a.address).collect();
    assert_eq!(addresses, vec![exact]);
}

#[test]
fn test_vesting_supply_sums_schedules() {
    let mut ledger = LedgerState::new(STAKE, vec!["denomA".to_string()], 100);
    ledger.insert_account(
        Account::new(Address::derive(b"v1"), Coins::new()).with_vesting(VestingSchedule::Delayed {
            original: coins(&[("denomA", 10)]),
            end_time: 1_000,
        }),
    );
    ledger.insert_account(
        Account::new(Address::derive(b"v2"), Coins::new()).with_vesting(VestingSchedule::Delayed {
            original: coins(&[("denomA", 5), ("denomB", 2)]),
            end_time: 1_000,
        }),
    );
    // fully vested by block time 100
    ledger.insert_account(
        Account::new(Address::derive(b"v3"), Coins::new()).with_vesting(VestingSchedule::Delayed {
            original: coins(&[("denomA", 99)]),
            end_time: 50,
        }),
    );

    let sink = Arc::new(MemorySink::new());
    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let report = job.run_blocking(&ledger, taken_at()).unwrap();

    assert_eq!(report.vesting_supply, coins(&[("denomA", 15), ("denomB", 2)]));
    assert_eq!(report.stats.vesting_accounts, 3);

    let bytes = sink.read(&report.vesting.key).unwrap().unwrap();
    let exported: Coins = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(exported, report.vesting_supply);
    assert_eq!(report.vesting.key, "vesting-2026-10-18T00:00:00Z.json");
}

#[test]
fn test_zero_share_validator_contributes_nothing() {
    let ghost = Address::derive(b"ghost");
    let live = Address::derive(b"live");
    let a = Address::derive(b"A");

    let mut ledger = LedgerState::new(STAKE, vec![STAKE.to_string()], 0);
    ledger.insert_account(Account::new(a, coins(&[(STAKE, 1_000_000)])));
    ledger.add_validator(Validator::new_bonded(ghost, 5_000_000, Dec::ZERO));
    ledger.add_validator(Validator::new_bonded(live, 10, Dec::from_int(10).unwrap()));
    ledger.add_delegation(Delegation {
        delegator: a,
        validator: ghost,
        shares: Dec::from_int(5_000_000).unwrap(),
    });
    ledger.add_delegation(Delegation {
        delegator: a,
        validator: live,
        shares: Dec::from_int(7).unwrap(),
    });

    let job = TrackingJob::new(TrackerConfig::default(), Arc::new(MemorySink::new()));
    let (aggregation, _) = job.aggregate(&ledger).unwrap();

    assert_eq!(aggregation.accounts[0].balance.amount_of(STAKE), 1_000_007);
    assert_eq!(aggregation.stats.delegations_without_rate, 1);
    assert_eq!(aggregation.stats.delegations_converted, 1);
}

#[test]
fn test_rankings_per_denomination_are_independent() {
    let mut ledger = LedgerState::new(STAKE, vec!["ukrw".to_string(), "uluna".to_string()], 0);
    let holdings = [(5_000_000, 1_000_000), (1_000_000, 9_000_000), (3_000_000, 0)];
    let addresses: Vec<Address> = (0..holdings.len() as u8).map(|i| Address::derive(&[i])).collect();
    for (address, (krw, luna)) in addresses.iter().zip(holdings) {
        ledger.insert_account(Account::new(*address, coins(&[("ukrw", krw), ("uluna", luna)])));
    }

    let sink = Arc::new(MemorySink::new());
    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let report = job.run_blocking(&ledger, taken_at()).unwrap();

    let krw = read_ranking(&sink, &report.rankings[0].key);
    let luna = read_ranking(&sink, &report.rankings[1].key);

    assert_eq!(
        krw.iter().map(|e| e.address).collect::<Vec<_>>(),
        vec![addresses[0], addresses[2], addresses[1]]
    );
    assert_eq!(
        luna.iter().map(|e| e.amount).collect::<Vec<_>>(),
        vec![9_000_000, 1_000_000, 0]
    );
    assert_eq!(luna.len(), 3);
}

#[test]
fn test_ranking_is_capped_at_max_entries() {
    let mut ledger = LedgerState::new(STAKE, vec!["uluna".to_string()], 0);
    for i in 0..1_200u32 {
        ledger.insert_account(Account::new(
            Address::derive(&i.to_le_bytes()),
            coins(&[("uluna", 1_000_000 + i as u128)]),
        ));
    }

    let sink = Arc::new(MemorySink::new());
    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let report = job.run_blocking(&ledger, taken_at()).unwrap();

    let ranking = read_ranking(&sink, &report.rankings[0].key);
    assert_eq!(ranking.len(), 1000);
    assert_eq!(ranking[0].amount, 1_000_000 + 1_199);
    assert!(ranking.windows(2).all(|w| w[0].amount >= w[1].amount));
    assert_eq!(ranking[999].amount, 1_000_000 + 200);
}

#[test]
fn test_ledger_read_failure_aborts_run() {
    let mut inner = LedgerState::new(STAKE, vec!["uluna".to_string()], 0);
    let broken = Address::derive(b"broken");
    inner.insert_account(Account::new(broken, coins(&[("uluna", 5_000_000)])));
    inner.insert_account(Account::new(Address::derive(b"fine"), coins(&[("uluna", 5_000_000)])));

    let sink = Arc::new(MemorySink::new());
    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let result = job.run_blocking(&FlakyLedger { inner, broken }, taken_at());

    assert!(matches!(
        result,
        Err(TrackerError::State(StateError::LedgerRead(_)))
    ));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_failed_artifact_does_not_stop_siblings() {
    let mut ledger = LedgerState::new(STAKE, vec!["ukrw".to_string(), "uluna".to_string()], 0);
    ledger.insert_account(Account::new(
        Address::derive(b"a"),
        coins(&[("ukrw", 2_000_000), ("uluna", 2_000_000)]),
    ));

    let sink = Arc::new(PickySink {
        inner: MemorySink::new(),
        needle: "-ukrw-",
    });
    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let report = job.run(&ledger, taken_at()).await.unwrap();

    let failed: Vec<&str> = report.failures().map(|r| r.key.as_str()).collect();
    assert_eq!(failed, vec!["tracking-ukrw-2026-10-18T00:00:00Z.json"]);
    assert!(!report.is_complete());
    assert!(report.vesting.is_success());
    assert!(report.rankings[1].is_success());
    assert_eq!(sink.inner.len(), 2);
}

#[tokio::test]
async fn test_spawned_run_writes_files() {
    let root = std::env::temp_dir().join(format!("tally-e2e-{}", std::process::id()));
    std::fs::remove_dir_all(&root).ok();
    let sink = Arc::new(FileSink::new(&root).unwrap());

    let mut ledger = LedgerState::new(STAKE, vec!["uluna".to_string()], 0);
    ledger.insert_account(Account::new(Address::derive(b"a"), coins(&[("uluna", 3_000_000)])));

    let job = TrackingJob::new(TrackerConfig::default(), sink.clone());
    let report = job.spawn(Arc::new(ledger), taken_at()).await.unwrap().unwrap();
    assert!(report.is_complete());

    let mut keys: Vec<String> = std::fs::read_dir(&root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "tracking-uluna-2026-10-18T00:00:00Z.json".to_string(),
            "vesting-2026-10-18T00:00:00Z.json".to_string(),
        ]
    );
    let vesting = std::fs::read_to_string(sink.path_for(&keys[1])).unwrap();
    assert_eq!(vesting, "[]");

    std::fs::remove_dir_all(&root).ok();
}
