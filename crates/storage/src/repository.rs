use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::snapshot::{SnapshotKey, Snapshots};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value contract for whole-value snapshots.
///
/// Every write replaces the stored value for its key. There is no patching,
/// no versioning and no cross-key transaction: concurrent writers to the same
/// key resolve as last write wins.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Read the raw snapshot stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read(&self, key: &SnapshotKey) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn write(&self, key: &SnapshotKey, value: &str) -> Result<(), StorageError>;

    /// Delete the snapshot under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn remove(&self, key: &SnapshotKey) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn read(&self, key: &SnapshotKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key.as_str()).cloned())
    }

    async fn write(&self, key: &SnapshotKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.as_str().to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key.as_str());
        Ok(())
    }
}

/// Aggregates the snapshot backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(InMemoryRepository::new());
        Self { snapshots }
    }

    /// Typed JSON view over the snapshot backend.
    #[must_use]
    pub fn typed(&self) -> Snapshots {
        Snapshots::new(Arc::clone(&self.snapshots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_replaces_whole_value() {
        let repo = InMemoryRepository::new();
        let key = SnapshotKey::subjects();
        repo.write(&key, "[1]").await.unwrap();
        repo.write(&key, "[2,3]").await.unwrap();

        assert_eq!(repo.read(&key).await.unwrap().as_deref(), Some("[2,3]"));
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_missing_key_is_ok() {
        let repo = InMemoryRepository::new();
        repo.remove(&SnapshotKey::user()).await.unwrap();
        assert!(repo.is_empty().unwrap());
        assert!(repo.read(&SnapshotKey::user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.write(&SnapshotKey::user(), "{}").await.unwrap();
        assert!(other.read(&SnapshotKey::user()).await.unwrap().is_some());
    }
}
