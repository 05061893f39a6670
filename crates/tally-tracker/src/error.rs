use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("State error: {0}")]
    State(#[from] tally_state::StateError),

    #[error("Core error: {0}")]
    Core(#[from] tally_core::CoreError),
}
