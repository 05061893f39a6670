use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tally_core::{hash_blake3, serialize, Coins, Hash};
use tally_state::ArtifactSink;
use tracing::{error, info};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::ranking::RankEntry;

/// RFC 3339 form used in artifact keys, e.g. `2026-10-18T09:30:00Z`
pub fn rfc3339(taken_at: DateTime<Utc>) -> String {
    taken_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A successfully written artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub bytes: usize,
    /// Blake3 digest of the written payload
    pub digest: Hash,
}

/// Result of one export; failures stay local to their artifact
#[derive(Debug)]
pub struct ExportReport {
    pub key: String,
    pub outcome: Result<ExportedArtifact, TrackerError>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Writes snapshot payloads as indented JSON artifacts
#[derive(Clone)]
pub struct SnapshotExporter {
    sink: Arc<dyn ArtifactSink>,
    vesting_prefix: String,
    ranking_prefix: String,
}

impl SnapshotExporter {
    pub fn new(sink: Arc<dyn ArtifactSink>, config: &TrackerConfig) -> Self {
        SnapshotExporter {
            sink,
            vesting_prefix: config.vesting_prefix.clone(),
            ranking_prefix: config.ranking_prefix.clone(),
        }
    }

    pub fn vesting_key(&self, taken_at: DateTime<Utc>) -> String {
        format!("{}-{}.json", self.vesting_prefix, rfc3339(taken_at))
    }

    pub fn ranking_key(&self, denom: &str, taken_at: DateTime<Utc>) -> String {
        format!("{}-{}-{}.json", self.ranking_prefix, denom, rfc3339(taken_at))
    }

    pub fn export_vesting(&self, vesting_supply: &Coins, taken_at: DateTime<Utc>) -> ExportReport {
        self.export(vesting_supply, self.vesting_key(taken_at))
    }

    pub fn export_ranking(
        &self,
        denom: &str,
        entries: &[RankEntry],
        taken_at: DateTime<Utc>,
    ) -> ExportReport {
        self.export(entries, self.ranking_key(denom, taken_at))
    }

    /// Serialize `payload` and write it under `key`. Errors are logged and
    /// reported, never raised.
    pub fn export<T: Serialize + ?Sized>(&self, payload: &T, key: String) -> ExportReport {
        let outcome = self.write_artifact(payload, &key);
        match &outcome {
            Ok(artifact) => info!(
                "Exported {} ({} bytes, digest {})",
                key, artifact.bytes, artifact.digest
            ),
            Err(e) => error!("Failed to export {}: {}", key, e),
        }
        ExportReport { key, outcome }
    }

    fn write_artifact<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        key: &str,
    ) -> Result<ExportedArtifact, TrackerError> {
        let bytes = serialize::to_json_pretty(payload)
            .map_err(|e| TrackerError::Serialization(e.to_string()))?;
        self.sink.write(key, &bytes)?;

        Ok(ExportedArtifact {
            bytes: bytes.len(),
            digest: hash_blake3(&bytes),
        })
    }
}
