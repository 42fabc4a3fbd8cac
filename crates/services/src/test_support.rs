use async_trait::async_trait;
use storage::repository::{SnapshotRepository, StorageError};
use storage::SnapshotKey;

/// Backend that reads as empty and rejects every write.
pub(crate) struct ReadOnlyRepository;

#[async_trait]
impl SnapshotRepository for ReadOnlyRepository {
    async fn read(&self, _key: &SnapshotKey) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn write(&self, _key: &SnapshotKey, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("quota exceeded".into()))
    }

    async fn remove(&self, _key: &SnapshotKey) -> Result<(), StorageError> {
        Err(StorageError::Connection("quota exceeded".into()))
    }
}
