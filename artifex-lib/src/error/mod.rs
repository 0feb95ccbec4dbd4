//! Error types

mod api;
mod selection;
mod storage;

pub use api::*;
pub use selection::*;
pub use storage::*;

/// Top-level error for operations that can fail for more than one reason.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A remote fetch failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bulk selection was rejected or stopped early.
    #[error(transparent)]
    BulkSelect(#[from] BulkSelectError),
}
