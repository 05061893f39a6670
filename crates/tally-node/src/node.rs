use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tally_state::{ArtifactSink, FileSink, LedgerState};
use tally_tracker::{TrackingJob, TrackingReport};
use tracing::{error, info, warn};

use crate::config::NodeConfig;

/// Scheduled tracking service
pub struct Tracker {
    config: NodeConfig,
    job: TrackingJob,
}

impl Tracker {
    /// Create a tracker writing artifacts under `config.output_dir`
    pub fn new(config: NodeConfig) -> Result<Self> {
        let sink = Arc::new(FileSink::new(config.output_dir.clone())?);
        Ok(Self::with_sink(config, sink))
    }

    pub fn with_sink(config: NodeConfig, sink: Arc<dyn ArtifactSink>) -> Self {
        let job = TrackingJob::new(config.to_tracker_config(), sink);
        Tracker { config, job }
    }

    /// Reload the ledger snapshot and take one tracking snapshot of it
    pub async fn run_once(&self) -> Result<TrackingReport> {
        let path = self.config.ledger_path.clone();
        let ledger = tokio::task::spawn_blocking(move || LedgerState::load(&path)).await??;

        let report = self.job.spawn(Arc::new(ledger), Utc::now()).await??;
        log_report(&report);
        Ok(report)
    }

    /// Run on a fixed interval until Ctrl-C. Failed runs are logged and the
    /// next tick proceeds normally.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await
    }

    /// Run on a fixed interval until `shutdown` resolves, including while a
    /// run is in flight. An interrupted run keeps writing in the background.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting tracker: ledger {:?}, output {:?}, every {}s",
            self.config.ledger_path, self.config.output_dir, self.config.interval_secs
        );

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        result = self.run_once() => {
                            if let Err(e) = result {
                                error!("Tracking run failed: {:#}", e);
                            }
                        }
                        _ = &mut shutdown => break,
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        info!("Shutting down tracker");
        Ok(())
    }
}

fn log_report(report: &TrackingReport) {
    info!(
        "Snapshot at {}: {} accounts visited, {} retained, {} artifacts",
        report.taken_at,
        report.stats.accounts_visited,
        report.stats.accounts_retained,
        report.rankings.len() + 1
    );
    if report.stats.delegations_without_rate > 0 {
        warn!(
            "{} delegations had no exchange rate",
            report.stats.delegations_without_rate
        );
    }
    for failed in report.failures() {
        if let Err(e) = &failed.outcome {
            warn!("Artifact {} not written: {}", failed.key, e);
        }
    }
}
