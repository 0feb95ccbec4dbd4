//! Durable key-value storage and the persisted selection
//!
//! [`StorageBackend`] is the raw string store; [`SelectionStore`] layers
//! the selection format and the load-before-save rule on top of it.

mod memory;
mod selection;
mod sqlite;

pub use memory::*;
pub use selection::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StorageError;

/// Trait for durable string storage.
///
/// Implementations are process-wide and expected to survive restarts
/// (the in-memory backend is the exception, meant for tests and
/// throwaway sessions).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
