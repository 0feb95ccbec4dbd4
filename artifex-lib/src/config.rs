//! Table configuration

use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::api::ROW_FIELDS;

/// Rows per page used by the artworks table.
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Storage key under which the selection is persisted.
pub const DEFAULT_SELECTION_KEY: &str = "artifex.selection";

/// Settings shared by the client, the selection store and the front end.
///
/// # Example
///
/// ```
/// use artifex_lib::TableConfig;
///
/// let config = TableConfig::default()
///     .with_page_size(10)
///     .with_storage_key("artifex.selection.review");
/// assert_eq!(config.page_size, 10);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Fixed number of rows per page. Never zero.
    pub page_size: usize,
    /// Root of the artworks API.
    pub base_url: String,
    /// Key the selection set is stored under.
    pub storage_key: String,
    /// Columns requested for each row.
    pub fields: Vec<String>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_key: DEFAULT_SELECTION_KEY.to_string(),
            fields: ROW_FIELDS.iter().map(|f| f.to_string()).collect(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
