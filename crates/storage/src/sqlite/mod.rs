use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{SnapshotRepository, Storage, StorageError};

mod migrate;
mod snapshot_repo;

/// Applied to every pooled connection. Snapshot writes are whole-slot
/// upserts, so WAL plus a busy timeout is enough for a second process.
const CONNECTION_PRAGMAS: &[&str] = &["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"];

const MAX_CONNECTIONS: u32 = 5;

/// Snapshot slots kept in a single `snapshots` table, one row per key.
#[derive(Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteSnapshotStore {
    /// Open a pool for `database_url`. Tables are not created until
    /// [`migrate`](Self::migrate) runs.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// a connection pragma is rejected.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    for pragma in CONNECTION_PRAGMAS {
                        sqlx::query(pragma).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        tracing::debug!(url = database_url, "sqlite snapshot store connected");
        Ok(Self { pool })
    }

    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Keys of every occupied slot, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the query fails.
    pub async fn stored_keys(&self) -> Result<Vec<String>, StorageError> {
        sqlx::query_scalar("SELECT key FROM snapshots ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

impl Storage {
    /// Snapshot storage backed by `SQLite`, migrated and ready to use.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteSnapshotStore::connect(database_url).await?;
        store.migrate().await?;
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(store);
        Ok(Self { snapshots })
    }
}
