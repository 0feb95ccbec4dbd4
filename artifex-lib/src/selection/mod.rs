//! Cross-page selection
//!
//! - [`SelectionSet`]: every selected row id, independent of loaded pages.
//! - [`DisplayedSelection`]: the part of the set visible on one page.
//! - [`SelectionManager`]: owns the set and persists every change.
//! - [`BulkSelector`]: "select the first N rows from here".

mod bulk;
mod manager;
mod set;

pub use bulk::*;
pub use manager::*;
pub use set::*;
