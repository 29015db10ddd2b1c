//! Model persistence layer
//!
//! Responsible for storing and loading the trained model blob.
//! Durable storage writes to the filesystem; in-memory is for tests and
//! ephemeral deployments.

use crate::error::ChatbotError;
use crate::Result;
use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Trait for model blob persistence
pub trait ModelStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Vec<u8>>>;
    fn save(&self, blob: &[u8]) -> Result<()>;
    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// In-memory model store
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    blob: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, e.g. with a deliberately corrupt blob in tests
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self {
            blob: Arc::new(RwLock::new(Some(blob))),
        }
    }
}

impl ModelStore for InMemoryModelStore {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.blob.read().clone())
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        *self.blob.write() = Some(blob.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Durable store: one file at a fixed path
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for FileModelStore {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChatbotError::StoreError(format!(
                "Failed to read model from {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // write-then-rename so a crash never leaves a half-written model
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), bytes = blob.len(), "Model blob written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_starts_empty() {
        let store = InMemoryModelStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(b"blob").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(&b"blob"[..]));
    }

    #[test]
    fn test_in_memory_store_clones_share_state() {
        let store = InMemoryModelStore::new();
        let other = store.clone();
        store.save(b"shared").unwrap();
        assert!(other.load().unwrap().is_some());
    }

    #[test]
    fn test_file_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("absent"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_creates_intermediate_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("nested").join("intent_classifier");
        let store = FileModelStore::new(&path);

        store.save(b"model bytes").unwrap();

        assert!(path.exists());
        assert_eq!(store.load().unwrap().unwrap(), b"model bytes".to_vec());
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileModelStore::new(dir.path().join("model.bin"));

        store.save(b"first").unwrap();
        store.save(b"second").unwrap();
        assert_eq!(store.load().unwrap().unwrap(), b"second".to_vec());
    }
}
