pub mod file;
pub mod memory;

use crate::error::StateError;

/// Destination for exported artifacts.
///
/// Writers may run concurrently, each with a distinct key.
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous artifact
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StateError>;

    /// Read an artifact back
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;
}

/// Keys become file names, so path separators and parent references are
/// refused everywhere.
pub(crate) fn validate_key(key: &str) -> Result<(), StateError> {
    if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
        return Err(StateError::InvalidKey(key.to_string()));
    }
    Ok(())
}

pub use file::FileSink;
pub use memory::MemorySink;
