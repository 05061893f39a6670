use std::sync::Arc;

use chrono::{DateTime, Utc};
use tally_core::Coins;
use tally_state::{AccountSource, ArtifactSink, StakingSource, WhitelistSource};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::aggregate::{AccountBalance, Aggregation, AggregationStats, BalanceAggregator};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::export::{ExportReport, SnapshotExporter};
use crate::filter::ThresholdFilter;
use crate::ranking::select_top_k;
use crate::rates::ExchangeRateTable;

/// Outcome of one tracking run
#[derive(Debug)]
pub struct TrackingReport {
    pub taken_at: DateTime<Utc>,
    pub stats: AggregationStats,
    pub vesting_supply: Coins,
    pub vesting: ExportReport,
    /// One report per whitelisted denomination, in whitelist order
    pub rankings: Vec<ExportReport>,
}

impl TrackingReport {
    pub fn failures(&self) -> impl Iterator<Item = &ExportReport> + '_ {
        std::iter::once(&self.vesting)
            .chain(self.rankings.iter())
            .filter(|report| !report.is_success())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// The snapshot job: a sequential aggregation pass followed by two
/// independent exports (vesting supply, per-denomination rankings).
#[derive(Clone)]
pub struct TrackingJob {
    config: TrackerConfig,
    exporter: SnapshotExporter,
}

impl TrackingJob {
    pub fn new(config: TrackerConfig, sink: Arc<dyn ArtifactSink>) -> Self {
        let exporter = SnapshotExporter::new(sink, &config);
        TrackingJob { config, exporter }
    }

    /// Build rates and run the aggregation pass. Returns the aggregation
    /// together with the whitelisted denominations it was filtered over.
    pub fn aggregate<L>(&self, ledger: &L) -> Result<(Aggregation, Vec<String>), TrackerError>
    where
        L: AccountSource + StakingSource + WhitelistSource + ?Sized,
    {
        let validators = ledger.all_validators()?;
        let rates = ExchangeRateTable::build(&validators)?;

        let denoms = ledger.whitelisted_denoms()?;
        let filter = ThresholdFilter::new(&denoms, u128::from(self.config.min_unit))?;
        let bond_denom = ledger.bond_denom()?;

        if rates.is_empty() && !validators.is_empty() {
            warn!("No validator has delegator shares; staked balances count as zero");
        }
        info!(
            "Tracking over {} validators ({} rates, {} skipped), floor [{}]",
            validators.len(),
            rates.len(),
            rates.skipped(),
            filter.floor()
        );

        let aggregator =
            BalanceAggregator::new(&rates, &filter, &bond_denom, self.config.unbonding_limit);
        let aggregation = aggregator.aggregate(ledger)?;
        Ok((aggregation, denoms))
    }

    pub fn export_vesting(&self, vesting_supply: &Coins, taken_at: DateTime<Utc>) -> ExportReport {
        info!("Start tracking vesting supply");
        let report = self.exporter.export_vesting(vesting_supply, taken_at);
        info!("End tracking vesting supply");
        report
    }

    /// Rank and export every denomination in turn; each selection works on
    /// its own view of `accounts`
    pub fn export_rankings(
        &self,
        accounts: &[AccountBalance],
        denoms: &[String],
        taken_at: DateTime<Utc>,
    ) -> Vec<ExportReport> {
        info!(
            "Start tracking top {} holders over {} denominations",
            self.config.max_entries,
            denoms.len()
        );

        let reports = denoms
            .iter()
            .map(|denom| {
                let entries = select_top_k(accounts, denom, self.config.max_entries);
                self.exporter.export_ranking(denom, &entries, taken_at)
            })
            .collect();

        info!("End tracking top holders");
        reports
    }

    /// Run everything on the calling thread
    pub fn run_blocking<L>(
        &self,
        ledger: &L,
        taken_at: DateTime<Utc>,
    ) -> Result<TrackingReport, TrackerError>
    where
        L: AccountSource + StakingSource + WhitelistSource + ?Sized,
    {
        let (aggregation, denoms) = self.aggregate(ledger)?;
        let vesting = self.export_vesting(&aggregation.vesting_supply, taken_at);
        let rankings = self.export_rankings(&aggregation.accounts, &denoms, taken_at);

        Ok(TrackingReport {
            taken_at,
            stats: aggregation.stats,
            vesting_supply: aggregation.vesting_supply,
            vesting,
            rankings,
        })
    }

    /// Aggregate on the caller, then run both exports concurrently on the
    /// blocking pool and wait for them
    pub async fn run<L>(
        &self,
        ledger: &L,
        taken_at: DateTime<Utc>,
    ) -> Result<TrackingReport, TrackerError>
    where
        L: AccountSource + StakingSource + WhitelistSource + ?Sized,
    {
        let (aggregation, denoms) = self.aggregate(ledger)?;
        let Aggregation {
            accounts,
            vesting_supply,
            stats,
        } = aggregation;
        let accounts = Arc::new(accounts);

        let vesting_task = {
            let job = self.clone();
            let supply = vesting_supply.clone();
            tokio::task::spawn_blocking(move || job.export_vesting(&supply, taken_at))
        };
        let ranking_task = {
            let job = self.clone();
            let accounts = Arc::clone(&accounts);
            tokio::task::spawn_blocking(move || job.export_rankings(&accounts, &denoms, taken_at))
        };

        let (vesting, rankings) = tokio::join!(vesting_task, ranking_task);

        Ok(TrackingReport {
            taken_at,
            stats,
            vesting_supply,
            vesting: vesting.map_err(|e| TrackerError::Task(e.to_string()))?,
            rankings: rankings.map_err(|e| TrackerError::Task(e.to_string()))?,
        })
    }

    /// Start a run in the background. The handle can be awaited for the
    /// report or dropped to leave the run detached.
    pub fn spawn<L>(
        &self,
        ledger: Arc<L>,
        taken_at: DateTime<Utc>,
    ) -> JoinHandle<Result<TrackingReport, TrackerError>>
    where
        L: AccountSource + StakingSource + WhitelistSource + Send + Sync + 'static,
    {
        let job = self.clone();
        tokio::spawn(async move { job.run(ledger.as_ref(), taken_at).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tally_core::{Account, Address, Coin};
    use tally_state::{LedgerState, MemorySink};

    fn ledger() -> LedgerState {
        let mut ledger = LedgerState::new(
            "uluna",
            vec!["uluna".to_string(), "ukrw".to_string()],
            0,
        );
        for i in 0..5u8 {
            ledger.insert_account(Account::new(
                Address::derive(&[i]),
                Coins::from_coins([Coin::new("uluna", 1_000_000 * (i as u128 + 1))]).unwrap(),
            ));
        }
        ledger
    }

    fn taken_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_zero_min_unit_fails_before_export() {
        let sink = Arc::new(MemorySink::new());
        let config = TrackerConfig {
            min_unit: 0,
            ..Default::default()
        };
        let job = TrackingJob::new(config, sink.clone());

        assert!(matches!(
            job.run_blocking(&ledger(), taken_at()),
            Err(TrackerError::Core(tally_core::CoreError::InvalidAmount(_)))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shareless_validators_only() {
        let mut ledger = ledger();
        let validator = Address::derive(b"drained");
        ledger.add_validator(tally_core::Validator::new_bonded(
            validator,
            0,
            tally_core::Dec::ZERO,
        ));
        ledger.add_delegation(tally_core::Delegation {
            delegator: Address::derive(&[0]),
            validator,
            shares: tally_core::Dec::ONE,
        });

        let job = TrackingJob::new(TrackerConfig::default(), Arc::new(MemorySink::new()));
        let (aggregation, _) = job.aggregate(&ledger).unwrap();
        assert_eq!(aggregation.stats.delegations_without_rate, 1);
        assert_eq!(aggregation.stats.accounts_retained, 5);
    }

    #[test]
    fn test_run_blocking_writes_all_artifacts() {
        let sink = Arc::new(MemorySink::new());
        let job = TrackingJob::new(TrackerConfig::default(), sink.clone());

        let report = job.run_blocking(&ledger(), taken_at()).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.stats.accounts_retained, 5);
        assert_eq!(report.rankings.len(), 2);
        assert_eq!(sink.len(), 3);
        assert_eq!(report.rankings[0].key, "tracking-uluna-2026-01-02T03:04:05Z.json");
        assert_eq!(report.rankings[1].key, "tracking-ukrw-2026-01-02T03:04:05Z.json");
    }

    #[test]
    fn test_max_entries_caps_rankings() {
        let sink = Arc::new(MemorySink::new());
        let config = TrackerConfig {
            max_entries: 2,
            ..Default::default()
        };
        let job = TrackingJob::new(config, sink.clone());

        let report = job.run_blocking(&ledger(), taken_at()).unwrap();
        let bytes = sink.read(&report.rankings[0].key).unwrap().unwrap();
        let entries: Vec<crate::RankEntry> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            entries.iter().map(|e| e.amount).collect::<Vec<_>>(),
            vec![5_000_000, 4_000_000]
        );
    }

    #[tokio::test]
    async fn test_async_run_matches_blocking() {
        let blocking_sink = Arc::new(MemorySink::new());
        let async_sink = Arc::new(MemorySink::new());
        let ledger = ledger();

        TrackingJob::new(TrackerConfig::default(), blocking_sink.clone())
            .run_blocking(&ledger, taken_at())
            .unwrap();
        let report = TrackingJob::new(TrackerConfig::default(), async_sink.clone())
            .run(&ledger, taken_at())
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(blocking_sink.snapshot(), async_sink.snapshot());
    }

    #[tokio::test]
    async fn test_spawned_run_can_be_awaited() {
        let sink = Arc::new(MemorySink::new());
        let job = TrackingJob::new(TrackerConfig::default(), sink.clone());

        let handle = job.spawn(Arc::new(ledger()), taken_at());
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.stats.accounts_visited, 5);
        assert_eq!(sink.len(), 3);
    }
}
