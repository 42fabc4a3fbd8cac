//! Fixed snapshot keys and a typed JSON layer over [`SnapshotRepository`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{SnapshotRepository, StorageError};

const USER_KEY: &str = "plania_user";
const REGISTERED_USERS_KEY: &str = "plania_registered_users";
const SUBJECTS_KEY: &str = "plania_subjects";

/// Name of a snapshot slot.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    /// Current signed-in identity.
    #[must_use]
    pub fn user() -> Self {
        Self(USER_KEY.to_owned())
    }

    /// All registered credential records.
    #[must_use]
    pub fn registered_users() -> Self {
        Self(REGISTERED_USERS_KEY.to_owned())
    }

    /// Subject list shared by every account on this device.
    #[must_use]
    pub fn subjects() -> Self {
        Self(SUBJECTS_KEY.to_owned())
    }

    /// Subject list belonging to a single account.
    #[must_use]
    pub fn subjects_for(email: &str) -> Self {
        Self(format!("{SUBJECTS_KEY}:{email}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotKey({})", self.0)
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads and writes serde values as JSON snapshots.
#[derive(Clone)]
pub struct Snapshots {
    repo: Arc<dyn SnapshotRepository>,
}

impl Snapshots {
    #[must_use]
    pub fn new(repo: Arc<dyn SnapshotRepository>) -> Self {
        Self { repo }
    }

    /// Load and decode the snapshot under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored JSON does not decode
    /// into `T`, or any backend error.
    pub async fn load<T: DeserializeOwned>(
        &self,
        key: &SnapshotKey,
    ) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.repo.read(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))
    }

    /// Encode `value` and replace the snapshot under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save<T: Serialize + ?Sized>(
        &self,
        key: &SnapshotKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))?;
        self.repo.write(key, &raw).await?;
        tracing::debug!(key = %key, bytes = raw.len(), "snapshot written");
        Ok(())
    }

    /// Drop the snapshot under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    pub async fn clear(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        self.repo.remove(key).await?;
        tracing::debug!(key = %key, "snapshot removed");
        Ok(())
    }
}
