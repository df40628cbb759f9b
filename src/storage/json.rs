/// JSON-file implementation of the record store
///
/// Each key maps to `<root>/<key>.json`. Records are written whole on every
/// save, matching the engine's synchronous write-through model.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{RecordStore, StorageError};

/// One-JSON-file-per-key store rooted at a data directory
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::info!(root = %root.display(), "JSON file store initialized");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Malformed stored data is recovered from, not propagated:
                // the caller proceeds from defaults.
                tracing::warn!(key, error = %e, "discarding unparseable record");
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, record: &serde_json::Value) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&path, bytes)?;
        tracing::debug!(key, "saved record");
        Ok(())
    }
}
