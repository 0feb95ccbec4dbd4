//! Artifex selection engine
//!
//! Cross-page row selection for a remotely paginated artwork table. The
//! selection set is keyed on global row identity, survives page navigation,
//! is persisted after every change and restored on startup. A bulk
//! "select the first N rows" operation walks forward through remote pages
//! on demand.

pub mod api;
pub mod error;
pub mod model;
pub mod rate_limit;
pub mod selection;
pub mod store;
pub mod table;

mod client;
mod config;

pub use client::*;
pub use config::*;
