//! Pagination controller.

use std::sync::Arc;

use crate::api::DatasetTotals;
use crate::api::Page;
use crate::api::PageSource;
use crate::api::fetch_totals_or_unknown;
use crate::error::ApiError;
use crate::model::Row;
use crate::selection::SelectionManager;

use super::PageWindow;
use super::TableView;

/// Load state of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A page request is pending.
    Loading { page: usize },
    /// The rows of `page` are on screen.
    Loaded { page: usize },
    /// Loading `page` failed; the previous rows are still on screen.
    Error { page: usize, message: String },
}

impl LoadState {
    /// Returns `true` while a page request is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns `true` if the last page request failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Tracks the page on screen and loads pages from a [`PageSource`].
///
/// The totals are fetched once at [`mount`](Self::mount), alongside the
/// first page, and never derived from page payloads. A failed page load
/// keeps the last good rows and window; the controller stays usable and
/// the same request can simply be made again.
pub struct PaginationController {
    source: Arc<dyn PageSource>,
    window: PageWindow,
    rows: Vec<Row>,
    state: LoadState,
}

impl PaginationController {
    /// Creates an idle controller on page 1.
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        let window = PageWindow::new(source.page_size());
        Self {
            source,
            window,
            rows: Vec::new(),
            state: LoadState::Idle,
        }
    }

    /// Loads the current page and the dataset totals concurrently.
    pub async fn mount(&mut self) -> &LoadState {
        let page = self.window.page_number;
        let previous = self.window;
        self.state = LoadState::Loading { page };

        let source = Arc::clone(&self.source);
        let (result, totals) = tokio::join!(
            source.fetch_page(page),
            fetch_totals_or_unknown(source.as_ref())
        );

        self.apply_totals(totals);
        self.apply_page(page, previous, result);
        &self.state
    }

    /// Fetches the totals again.
    pub async fn refresh_totals(&mut self) -> DatasetTotals {
        let totals = fetch_totals_or_unknown(self.source.as_ref()).await;
        self.apply_totals(totals);
        DatasetTotals::new(self.window.total_rows, self.window.total_pages)
    }

    /// Handles the paginator's page-change event.
    pub async fn on_page_change(&mut self, first_offset: usize, page_number: usize) -> &LoadState {
        let page = page_number.max(1);
        let previous = self.window;

        self.window.page_number = page;
        self.window.first_offset = first_offset;
        self.state = LoadState::Loading { page };

        let result = self.source.fetch_page(page).await;
        self.apply_page(page, previous, result);
        &self.state
    }

    /// Navigates to `page`, clamped to the known page range.
    pub async fn go_to(&mut self, page: usize) -> &LoadState {
        let page = self.window.clamp_page(page);
        let offset = self.window.offset_of(page);
        self.on_page_change(offset, page).await
    }

    /// Navigates to the next page.
    pub async fn next_page(&mut self) -> &LoadState {
        self.go_to(self.window.page_number.saturating_add(1)).await
    }

    /// Navigates to the previous page.
    pub async fn prev_page(&mut self) -> &LoadState {
        self.go_to(self.window.page_number.saturating_sub(1)).await
    }

    /// Loads the current page again.
    pub async fn reload(&mut self) -> &LoadState {
        self.go_to(self.window.page_number).await
    }

    /// Builds the widget input for the current page.
    pub fn view(&self, selection: &SelectionManager) -> TableView {
        TableView {
            rows: self.rows.clone(),
            displayed_selection: selection.displayed_selection(&self.rows),
            page_size: self.window.page_size,
            first_offset: self.window.first_offset,
            total_records: self.window.total_rows,
            page_number: self.window.page_number,
            total_pages: self.window.total_pages,
            state: self.state.clone(),
        }
    }

    /// Returns the rows on screen.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the current window.
    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Returns the load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the page source.
    pub fn source(&self) -> &Arc<dyn PageSource> {
        &self.source
    }

    fn apply_totals(&mut self, totals: DatasetTotals) {
        self.window = self.window.with_totals(totals);
    }

    fn apply_page(&mut self, page: usize, previous: PageWindow, result: Result<Page, ApiError>) {
        match result {
            Ok(loaded) => {
                log::debug!("Showing page {} ({} rows)", page, loaded.len());
                self.rows = loaded.into_rows();
                self.window.page_number = page;
                self.window.first_offset = self.window.offset_of(page);
                self.state = LoadState::Loaded { page };
            }
            Err(e) => {
                log::error!("Error fetching page {}: {}", page, e);
                self.window.page_number = previous.page_number;
                self.window.first_offset = previous.first_offset;
                self.state = LoadState::Error {
                    page,
                    message: e.to_string(),
                };
            }
        }
    }
}
