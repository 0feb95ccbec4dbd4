//! "Select the first N rows" across page boundaries.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use super::SelectionManager;
use super::SelectionSet;
use crate::api::PageSource;
use crate::error::ApiError;
use crate::error::BulkSelectError;
use crate::model::Row;
use crate::table::PageWindow;

/// Parses the bulk-select input box.
///
/// Only positive integers are accepted; surrounding whitespace is ignored.
pub fn parse_bulk_count(input: &str) -> Result<usize, BulkSelectError> {
    match input.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(BulkSelectError::InvalidInput(input.to_string())),
    }
}

/// Summary of a bulk selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Rows asked for.
    pub requested: usize,
    /// Distinct rows collected from the range.
    pub selected: usize,
    /// Of those, how many were not already selected.
    pub newly_selected: usize,
    /// Pages fetched beyond the one on screen.
    pub pages_fetched: usize,
    /// `true` if the dataset ended before `requested` rows were found.
    pub exhausted: bool,
}

/// Selects the first N rows starting at the top of the visible page.
///
/// Rows come from the loaded page first, then from the following pages,
/// fetched one at a time: each request completes before the next is sent,
/// so the stop condition sees an exact running count and only one page is
/// held at a time. The collected ids are merged into the existing selection;
/// nothing outside the range is deselected.
///
/// Only one selection runs at a time per selector. [`TableSession`] already
/// serialises calls through `&mut self`; the flag guards callers that share
/// one selector (for example behind an `Arc`) across tasks, where a second
/// call while one is pending fails with [`BulkSelectError::Busy`].
///
/// [`TableSession`]: crate::table::TableSession There is no rollback: if a fetch
/// fails, what was collected so far stays selected and the error carries
/// the partial [`BulkOutcome`].
#[derive(Debug, Default)]
pub struct BulkSelector {
    busy: AtomicBool,
}

impl BulkSelector {
    /// Creates an idle selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a selection is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Selects up to `count` rows from `window.first_offset` onwards.
    ///
    /// `loaded` are the rows of `window.page_number`, already on screen.
    pub async fn select_first(
        &self,
        source: &dyn PageSource,
        window: &PageWindow,
        loaded: &[Row],
        count: usize,
        selection: &mut SelectionManager,
    ) -> Result<BulkOutcome, BulkSelectError> {
        if count == 0 {
            return Err(BulkSelectError::InvalidInput(count.to_string()));
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(BulkSelectError::Busy)?;

        let collected = collect(source, window, loaded, count).await;
        let selected = collected.ids.len();
        let newly_selected = selection.extend(collected.ids).await;

        let outcome = BulkOutcome {
            requested: count,
            selected,
            newly_selected,
            pages_fetched: collected.pages_fetched,
            exhausted: collected.failure.is_none() && collected.taken < count,
        };

        match collected.failure {
            Some((page, source)) => {
                log::error!(
                    "Bulk selection stopped at page {} after {} of {} rows: {}",
                    page,
                    selected,
                    count,
                    source
                );
                Err(BulkSelectError::Fetch {
                    page,
                    source,
                    outcome,
                })
            }
            None => {
                log::info!(
                    "Bulk selected {} of {} rows ({} new, {} extra page(s))",
                    selected,
                    count,
                    newly_selected,
                    outcome.pages_fetched
                );
                Ok(outcome)
            }
        }
    }
}

struct Collected {
    ids: SelectionSet,
    taken: usize,
    pages_fetched: usize,
    failure: Option<(usize, ApiError)>,
}

async fn collect(
    source: &dyn PageSource,
    window: &PageWindow,
    loaded: &[Row],
    count: usize,
) -> Collected {
    let mut ids = SelectionSet::new();

    let start = window.local_start().min(loaded.len());
    let take = count.min(loaded.len() - start);
    ids.extend(loaded[start..start + take].iter().map(|row| row.id.clone()));

    let mut taken = take;
    let mut cursor = window.page_number;
    let mut pages_fetched = 0;
    let mut failure = None;

    while taken < count && cursor < window.total_pages {
        let next = cursor + 1;

        let page = match source.fetch_page(next).await {
            Ok(page) => page,
            Err(e) => {
                failure = Some((next, e));
                break;
            }
        };
        pages_fetched += 1;

        // Totals can be stale; an empty page means the data ended early.
        if page.is_empty() {
            log::warn!(
                "Page {} is empty but totals report {} pages",
                next,
                window.total_pages
            );
            break;
        }

        let remaining = count - taken;
        let rows = page.rows();
        let take = remaining.min(rows.len());
        ids.extend(rows[..take].iter().map(|row| row.id.clone()));

        taken += take;
        cursor = next;
    }

    Collected {
        ids,
        taken,
        pages_fetched,
        failure,
    }
}

/// Holds the busy flag for the lifetime of one selection.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::DatasetTotals;
    use crate::api::MemorySource;
    use crate::model::RowId;

    async fn loaded_window(source: &MemorySource, page: usize) -> (PageWindow, Vec<Row>) {
        let totals = source.fetch_totals().await.unwrap();
        let rows = source.fetch_page(page).await.unwrap().into_rows();
        let window = PageWindow::at_page(source.page_size(), page).with_totals(totals);
        (window, rows)
    }

    fn ids(selection: &SelectionManager) -> Vec<String> {
        selection.ids().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_parse_bulk_count() {
        assert_eq!(parse_bulk_count("8").unwrap(), 8);
        assert_eq!(parse_bulk_count("  12 ").unwrap(), 12);
        assert!(matches!(
            parse_bulk_count("0"),
            Err(BulkSelectError::InvalidInput(_))
        ));
        assert!(parse_bulk_count("-3").is_err());
        assert!(parse_bulk_count("ten").is_err());
        assert!(parse_bulk_count("").is_err());
        assert!(parse_bulk_count("2.5").is_err());
    }

    #[tokio::test]
    async fn test_crosses_page_boundary() {
        let source = MemorySource::generated(10, 7);
        let (window, rows) = loaded_window(&source, 1).await;
        let mut selection = SelectionManager::new();

        let outcome = BulkSelector::new()
            .select_first(&source, &window, &rows, 8, &mut selection)
            .await
            .unwrap();

        assert_eq!(outcome.selected, 8);
        assert_eq!(outcome.pages_fetched, 1);
        assert!(!outcome.exhausted);
        for id in 1..=8 {
            assert!(selection.is_selected(&id.to_string()));
        }
        assert!(!selection.is_selected("9"));
    }

    #[tokio::test]
    async fn test_count_equal_to_and_above_total() {
        for count in [10, 11, 500] {
            let source = MemorySource::generated(10, 7);
            let (window, rows) = loaded_window(&source, 1).await;
            let mut selection = SelectionManager::new();

            let outcome = BulkSelector::new()
                .select_first(&source, &window, &rows, count, &mut selection)
                .await
                .unwrap();

            assert_eq!(selection.len(), 10);
            assert_eq!(outcome.selected, 10);
            assert_eq!(outcome.exhausted, count > 10);
            assert_eq!(source.fetched_pages().await, vec![1, 2]);
        }
    }

    #[tokio::test]
    async fn test_zero_is_rejected_without_change() {
        let source = MemorySource::generated(10, 7);
        let (window, rows) = loaded_window(&source, 1).await;
        let mut selection = SelectionManager::new();

        let err = BulkSelector::new()
            .select_first(&source, &window, &rows, 0, &mut selection)
            .await
            .unwrap_err();

        assert!(matches!(err, BulkSelectError::InvalidInput(_)));
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_starts_at_current_page_and_keeps_other_selections() {
        let source = MemorySource::generated(20, 5);
        let (window, rows) = loaded_window(&source, 2).await;
        let mut selection = SelectionManager::new();
        selection
            .extend(["1", "19"].into_iter().map(RowId::from).collect())
            .await;

        let outcome = BulkSelector::new()
            .select_first(&source, &window, &rows, 7, &mut selection)
            .await
            .unwrap();

        assert_eq!(outcome.selected, 7);
        assert_eq!(outcome.newly_selected, 7);
        assert_eq!(
            ids(&selection),
            ["1", "10", "11", "12", "19", "6", "7", "8", "9"]
        );
        assert_eq!(source.fetched_pages().await, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_unsettled_window_starts_at_offset() {
        let source = MemorySource::generated(10, 7);
        let (mut window, rows) = loaded_window(&source, 1).await;
        window.first_offset = 5;
        let mut selection = SelectionManager::new();

        BulkSelector::new()
            .select_first(&source, &window, &rows, 3, &mut selection)
            .await
            .unwrap();

        assert_eq!(ids(&selection), ["6", "7", "8"]);
    }

    #[tokio::test]
    async fn test_pages_fetched_sequentially() {
        let source = MemorySource::generated(30, 3);
        let (window, rows) = loaded_window(&source, 1).await;
        let mut selection = SelectionManager::new();

        BulkSelector::new()
            .select_first(&source, &window, &rows, 14, &mut selection)
            .await
            .unwrap();

        assert_eq!(source.fetched_pages().await, vec![1, 2, 3, 4, 5]);
        assert_eq!(selection.len(), 14);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_partial_progress() {
        let source = MemorySource::generated(30, 5);
        let (window, rows) = loaded_window(&source, 1).await;
        source.fail_page(3);
        let selector = BulkSelector::new();
        let mut selection = SelectionManager::new();

        let err = selector
            .select_first(&source, &window, &rows, 20, &mut selection)
            .await
            .unwrap_err();

        match err {
            BulkSelectError::Fetch { page, outcome, .. } => {
                assert_eq!(page, 3);
                assert_eq!(outcome.selected, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(selection.len(), 10);
        assert!(!selector.is_busy());
    }

    #[tokio::test]
    async fn test_busy_rejects_overlapping_call() {
        let source = MemorySource::generated(10, 7).with_latency(Duration::from_millis(50));
        let (window, rows) = loaded_window(&source, 1).await;
        let selector = BulkSelector::new();
        let mut first = SelectionManager::new();
        let mut second = SelectionManager::new();

        // The first call parks on the page 2 fetch before the second starts.
        let (running, rejected) = tokio::join!(
            selector.select_first(&source, &window, &rows, 10, &mut first),
            async {
                assert!(selector.is_busy());
                selector
                    .select_first(&source, &window, &rows, 3, &mut second)
                    .await
            }
        );

        assert_eq!(running.unwrap().selected, 10);
        assert!(matches!(rejected, Err(BulkSelectError::Busy)));
        assert!(second.is_empty());
        assert!(!selector.is_busy());
    }

    #[tokio::test]
    async fn test_stale_totals_stop_on_empty_page() {
        let source = MemorySource::generated(10, 7);
        let rows = source.fetch_page(1).await.unwrap().into_rows();
        let window = PageWindow::new(7).with_totals(DatasetTotals::new(40, 6));
        let mut selection = SelectionManager::new();

        let outcome = BulkSelector::new()
            .select_first(&source, &window, &rows, 30, &mut selection)
            .await
            .unwrap();

        assert_eq!(outcome.selected, 10);
        assert!(outcome.exhausted);
        assert_eq!(source.fetched_pages().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_totals_use_loaded_page_only() {
        let source = MemorySource::generated(10, 7);
        let rows = source.fetch_page(1).await.unwrap().into_rows();
        let window = PageWindow::new(7);
        let mut selection = SelectionManager::new();

        let outcome = BulkSelector::new()
            .select_first(&source, &window, &rows, 9, &mut selection)
            .await
            .unwrap();

        assert_eq!(outcome.selected, 7);
        assert_eq!(outcome.pages_fetched, 0);
    }
}
