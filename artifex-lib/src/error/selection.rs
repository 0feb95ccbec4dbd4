//! Bulk selection error types

use super::ApiError;
use crate::selection::BulkOutcome;

/// Errors returned by a "select the first N rows" request.
///
/// None of these leave the selection in an inconsistent state: an invalid
/// request changes nothing, and a failed fetch keeps what was collected
/// before the failure.
#[derive(Debug, thiserror::Error)]
pub enum BulkSelectError {
    /// The requested count was not a positive integer.
    #[error("invalid row count: {0:?}")]
    InvalidInput(String),

    /// Another bulk selection is still running.
    #[error("a bulk selection is already in progress")]
    Busy,

    /// Fetching a follow-up page failed; partial progress was kept.
    #[error("fetching page {page} failed after selecting {} rows: {source}", .outcome.selected)]
    Fetch {
        /// The page that failed to load.
        page: usize,
        /// The underlying fetch error.
        source: ApiError,
        /// What had been selected before the failure.
        outcome: BulkOutcome,
    },
}

impl BulkSelectError {
    /// Returns the partial outcome if the selection stopped on a fetch error.
    pub fn partial_outcome(&self) -> Option<&BulkOutcome> {
        match self {
            Self::Fetch { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}
