use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{validate_key, ArtifactSink};
use crate::error::StateError;

/// In-memory artifact sink
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Get the number of stored artifacts
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }

    /// Copy of every stored artifact (for debugging/testing)
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.artifacts.read().clone()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StateError> {
        validate_key(key)?;
        self.artifacts.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.artifacts.read().get(key).cloned())
    }
}
