//! Persisted selection set.
//!
//! ## Stored layout
//!
//! The selection is stored as JSON under a single key:
//!
//! ```json
//! {"version": 1, "ids": ["27992", "28560"], "saved_at": "2026-10-19T08:00:00Z"}
//! ```
//!
//! The older unversioned layout, a bare array of ids, is still read.
//! Anything else (bad JSON, an unknown version) loads as an empty selection.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::StorageBackend;
use crate::error::StorageError;
use crate::model::RowId;
use crate::selection::SelectionSet;

/// Current version of the stored layout.
pub const SELECTION_FORMAT_VERSION: u32 = 1;

/// What a call to [`SelectionStore::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The selection was written.
    Saved,
    /// Nothing was written because the store has not been loaded yet.
    SkippedBeforeLoad,
}

/// Loads and saves the selection set under one storage key.
///
/// Saving is refused until [`load`](Self::load) has completed successfully.
/// Without that rule an empty selection created at startup could be written
/// before the previous session's selection was read, wiping it.
pub struct SelectionStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    loaded: bool,
}

impl SelectionStore {
    /// Creates a store for `key` on `backend`.
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            loaded: false,
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` once a load has completed and saves are allowed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reads the stored selection.
    ///
    /// A missing key or malformed data yields an empty set. If the backend
    /// itself cannot be read, the store stays unloaded so the unknown stored
    /// value is never overwritten.
    pub async fn load(&mut self) -> SelectionSet {
        let raw = match self.backend.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                log::error!(
                    "Could not read selection '{}': {}; changes will not be saved",
                    self.key,
                    e
                );
                return SelectionSet::new();
            }
        };

        self.loaded = true;

        let Some(raw) = raw else {
            log::debug!("No stored selection under '{}'", self.key);
            return SelectionSet::new();
        };

        match decode_selection(&raw) {
            Some(set) => {
                log::info!("Restored {} selected row(s) from '{}'", set.len(), self.key);
                set
            }
            None => {
                log::warn!(
                    "Stored selection under '{}' is malformed, starting empty",
                    self.key
                );
                SelectionSet::new()
            }
        }
    }

    /// Writes `set`, unless the store has not been loaded yet.
    pub async fn save(&self, set: &SelectionSet) -> Result<PersistOutcome, StorageError> {
        if !self.loaded {
            return Ok(PersistOutcome::SkippedBeforeLoad);
        }

        let raw = encode_selection(set)?;
        self.backend.set(&self.key, raw).await?;
        Ok(PersistOutcome::Saved)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSelection {
    version: u32,
    ids: Vec<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned(StoredSelection),
    Legacy(Vec<RowId>),
}

/// Encodes a selection in the current stored layout.
pub fn encode_selection(set: &SelectionSet) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredSelection {
        version: SELECTION_FORMAT_VERSION,
        ids: set.iter().cloned().collect(),
        saved_at: Some(Utc::now()),
    })
}

/// Decodes a stored selection, returning `None` for anything unreadable.
pub fn decode_selection(raw: &str) -> Option<SelectionSet> {
    match serde_json::from_str::<StoredLayout>(raw) {
        Ok(StoredLayout::Versioned(stored)) if stored.version == SELECTION_FORMAT_VERSION => {
            Some(stored.ids.into_iter().collect())
        }
        Ok(StoredLayout::Versioned(stored)) => {
            log::warn!("Unsupported selection format version {}", stored.version);
            None
        }
        Ok(StoredLayout::Legacy(ids)) => Some(ids.into_iter().collect()),
        Err(_) => None,
    }
}
