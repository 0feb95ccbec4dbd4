//! The `PageSource` trait and its lenient totals helper.

use async_trait::async_trait;

use super::DatasetTotals;
use super::Page;
use crate::error::ApiError;

/// A remotely paginated, fixed page size dataset.
///
/// # Ordering
///
/// Implementations must return rows in a stable order: fetching the same
/// page twice against the same backing data must yield the same rows in the
/// same order. "Select the first N rows from here" is only well defined
/// under that guarantee. The selection engine does not re-verify it; a source
/// whose order shifts between calls (for example, a live feed with inserts at
/// the head) will produce a selection that does not match what the user saw.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches page `page` (1-based).
    async fn fetch_page(&self, page: usize) -> Result<Page, ApiError>;

    /// Fetches the total row and page counts.
    async fn fetch_totals(&self) -> Result<DatasetTotals, ApiError>;

    /// Returns the fixed number of rows per page.
    fn page_size(&self) -> usize;
}

/// Fetches the totals, substituting unknown (zero) totals on failure.
///
/// The failure is logged and never reaches the caller.
pub async fn fetch_totals_or_unknown(source: &dyn PageSource) -> DatasetTotals {
    match source.fetch_totals().await {
        Ok(totals) => totals,
        Err(e) => {
            log::error!("Error fetching total pages: {}", e);
            DatasetTotals::default()
        }
    }
}
