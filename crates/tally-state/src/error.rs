use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Ledger read failed: {0}")]
    LedgerRead(String),

    #[error("Snapshot load failed: {0}")]
    SnapshotLoad(String),

    #[error("Artifact sink error: {0}")]
    Sink(String),

    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),

    #[error("Core error: {0}")]
    Core(#[from] tally_core::CoreError),
}
