//! SQLite storage backend with a write-through cache.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::StorageBackend;
use crate::error::StorageError;

/// A persistent storage backend backed by SQLite.
///
/// Values live in a single `kv` table and survive process restarts. Reads
/// are served from a DashMap cache once a key has been seen; writes go to
/// the database first and then to the cache.
///
/// # Example
///
/// ```ignore
/// use artifex_lib::store::SqliteStorage;
///
/// let storage = SqliteStorage::open("selection.db").await?;
/// ```
pub struct SqliteStorage {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        Self::init_schema(&client).await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    /// Opens an in-memory database. Data is lost when the storage is dropped.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;

        Self::init_schema(&client).await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    async fn init_schema(client: &Client) -> Result<(), StorageError> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS kv (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL,
                        updated_at INTEGER NOT NULL
                    )",
                    [],
                )
            })
            .await?;
        Ok(())
    }

    /// Closes the connection, flushing pending writes.
    pub async fn close(self) -> Result<(), StorageError> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let key_owned = key.to_string();
        let value_owned = value.clone();
        let updated_at = Utc::now().timestamp();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                    updated_at = excluded.updated_at",
                    rusqlite::params![key_owned, value_owned, updated_at],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }
}
