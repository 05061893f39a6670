use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{validate_key, ArtifactSink};
use crate::error::StateError;

/// Directory-backed sink: one file per artifact key.
///
/// Each write goes to a temporary file first and is renamed into place, so
/// readers never observe a partially written artifact.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self, StateError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StateError::Sink(e.to_string()))?;
        Ok(FileSink { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ArtifactSink for FileSink {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StateError> {
        validate_key(key)?;

        let path = self.path_for(key);
        let tmp_path = self.root.join(format!(".{}.tmp", key));
        if let Err(e) = fs::write(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, &path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StateError::Sink(e.to_string()));
        }

        debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        validate_key(key)?;
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::Sink(e.to_string())),
        }
    }
}
