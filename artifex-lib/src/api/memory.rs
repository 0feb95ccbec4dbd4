//! In-process page source over a fixed dataset.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::Mutex;

use super::DatasetTotals;
use super::Page;
use super::PageSource;
use crate::error::ApiError;
use crate::model::Row;

/// A [`PageSource`] serving a fixed list of rows.
///
/// Ordering is the order of the backing `Vec`, so it is stable by
/// construction. Individual pages (or the totals request) can be made to
/// fail, and every page request is recorded, which makes the source useful
/// for offline runs and for exercising the selection engine.
///
/// # Example
///
/// ```
/// use artifex_lib::api::MemorySource;
/// use artifex_lib::api::PageSource;
///
/// let source = MemorySource::generated(10, 7);
/// assert_eq!(source.page_size(), 7);
/// ```
#[derive(Debug)]
pub struct MemorySource {
    rows: Vec<Row>,
    page_size: usize,
    latency: Option<Duration>,
    failing_pages: DashSet<usize>,
    failing_totals: AtomicBool,
    fetch_log: Mutex<Vec<usize>>,
}

impl MemorySource {
    /// Creates a source over `rows` with the given page size.
    pub fn new(rows: Vec<Row>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            latency: None,
            failing_pages: DashSet::new(),
            failing_totals: AtomicBool::new(false),
            fetch_log: Mutex::new(Vec::new()),
        }
    }

    /// Creates a source of `count` synthetic artworks with ids `1..=count`.
    pub fn generated(count: usize, page_size: usize) -> Self {
        let rows = (1..=count)
            .map(|n| {
                Row::new(n as u64, format!("Artwork #{}", n))
                    .with_artist(format!("Artist {}", (n % 13) + 1))
                    .with_dates(1800 + n as i64, 1801 + n as i64)
            })
            .collect();
        Self::new(rows, page_size)
    }

    /// Adds an artificial delay to every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every request for `page` fail until [`heal_page`](Self::heal_page).
    pub fn fail_page(&self, page: usize) {
        self.failing_pages.insert(page);
    }

    /// Lets requests for `page` succeed again.
    pub fn heal_page(&self, page: usize) {
        self.failing_pages.remove(&page);
    }

    /// Makes the totals request fail (or succeed again).
    pub fn fail_totals(&self, failing: bool) {
        self.failing_totals.store(failing, Ordering::SeqCst);
    }

    /// Returns every page number requested so far, in request order.
    pub async fn fetched_pages(&self) -> Vec<usize> {
        self.fetch_log.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch_page(&self, page: usize) -> Result<Page, ApiError> {
        self.fetch_log.lock().await.push(page);
        self.simulate_latency().await;

        if page == 0 {
            return Err(ApiError::InvalidUrl("page numbers start at 1".to_string()));
        }
        if self.failing_pages.contains(&page) {
            return Err(ApiError::http(503, format!("page {} unavailable", page)));
        }

        let start = (page - 1).saturating_mul(self.page_size);
        let rows = self
            .rows
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        Ok(Page::new(page, rows))
    }

    async fn fetch_totals(&self) -> Result<DatasetTotals, ApiError> {
        self.simulate_latency().await;

        if self.failing_totals.load(Ordering::SeqCst) {
            return Err(ApiError::http(503, "totals unavailable"));
        }
        Ok(DatasetTotals::from_rows(self.rows.len(), self.page_size))
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_are_sliced_in_order() {
        let source = MemorySource::generated(10, 7);

        let first = source.fetch_page(1).await.unwrap();
        let second = source.fetch_page(2).await.unwrap();
        let third = source.fetch_page(3).await.unwrap();

        assert_eq!(first.len(), 7);
        assert_eq!(second.len(), 3);
        assert!(third.is_empty());
        assert_eq!(second.rows()[0].id.as_str(), "8");
        assert_eq!(source.fetched_pages().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_stable() {
        let source = MemorySource::generated(20, 5);
        let before = source.fetch_page(3).await.unwrap();
        let after = source.fetch_page(3).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = MemorySource::generated(10, 7);
        source.fail_page(2);
        assert!(source.fetch_page(2).await.is_err());
        source.heal_page(2);
        assert!(source.fetch_page(2).await.is_ok());

        assert!(source.fetch_page(0).await.is_err());
    }

    #[tokio::test]
    async fn test_totals() {
        let source = MemorySource::generated(10, 7);
        assert_eq!(
            source.fetch_totals().await.unwrap(),
            DatasetTotals::new(10, 2)
        );
        source.fail_totals(true);
        assert!(source.fetch_totals().await.is_err());
    }
}
