//! Storage error types

/// Errors raised by a [`StorageBackend`](crate::store::StorageBackend).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The SQLite database failed.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A value could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
