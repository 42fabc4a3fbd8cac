use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteSnapshotStore;
use crate::repository::{SnapshotRepository, StorageError};
use crate::snapshot::SnapshotKey;

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SnapshotRepository for SqliteSnapshotStore {
    async fn read(&self, key: &SnapshotKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM snapshots WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let value: String = row
            .try_get("value")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    async fn write(&self, key: &SnapshotKey, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn remove(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM snapshots WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
