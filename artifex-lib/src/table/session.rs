//! Table session: the boundary between the selection engine and the widget.

use std::sync::Arc;

use crate::api::PageSource;
use crate::error::BulkSelectError;
use crate::model::Row;
use crate::selection::BulkOutcome;
use crate::selection::BulkSelector;
use crate::selection::SelectionManager;
use crate::selection::SelectionSet;
use crate::selection::parse_bulk_count;
use crate::store::SelectionStore;

use super::LoadState;
use super::PaginationController;
use super::PageWindow;
use super::TableView;

/// One table on screen with its cross-page selection.
///
/// Owns the [`PaginationController`], the [`SelectionManager`] and the
/// [`BulkSelector`]. The widget renders [`view`](Self::view) and reports
/// back through `on_page_change` and `on_selection_change`.
///
/// # Example
///
/// ```ignore
/// use artifex_lib::table::TableSession;
///
/// let mut session = TableSession::open(source, Some(store)).await;
/// session.set_bulk_input("8");
/// let outcome = session.submit_bulk_input().await?;
/// ```
pub struct TableSession {
    controller: PaginationController,
    selection: SelectionManager,
    bulk: BulkSelector,
}

impl TableSession {
    /// Creates a session without loading anything.
    pub fn new(source: Arc<dyn PageSource>, selection: SelectionManager) -> Self {
        Self {
            controller: PaginationController::new(source),
            selection,
            bulk: BulkSelector::new(),
        }
    }

    /// Creates a session, restores the stored selection and loads page 1.
    pub async fn open(source: Arc<dyn PageSource>, store: Option<SelectionStore>) -> Self {
        let selection = match store {
            Some(store) => SelectionManager::with_store(store),
            None => SelectionManager::new(),
        };
        let mut session = Self::new(source, selection);
        session.start().await;
        session
    }

    /// Restores the selection and mounts the controller concurrently.
    pub async fn start(&mut self) {
        let _ = tokio::join!(self.selection.restore(), self.controller.mount());
    }

    /// Builds the widget input for the current page.
    pub fn view(&self) -> TableView {
        self.controller.view(&self.selection)
    }

    /// Handles the paginator's page-change event.
    pub async fn on_page_change(&mut self, first_offset: usize, page_number: usize) -> &LoadState {
        self.controller.on_page_change(first_offset, page_number).await
    }

    /// Navigates to `page`.
    pub async fn go_to(&mut self, page: usize) -> &LoadState {
        self.controller.go_to(page).await
    }

    /// Navigates to the next page.
    pub async fn next_page(&mut self) -> &LoadState {
        self.controller.next_page().await
    }

    /// Navigates to the previous page.
    pub async fn prev_page(&mut self) -> &LoadState {
        self.controller.prev_page().await
    }

    /// Reloads the current page.
    pub async fn reload(&mut self) -> &LoadState {
        self.controller.reload().await
    }

    /// Handles the widget's selection-change event.
    ///
    /// `checked` is the set of checked rows of the current page.
    pub async fn on_selection_change(&mut self, checked: &[Row]) -> &SelectionSet {
        self.selection
            .toggle_rows(self.controller.rows(), checked)
            .await
    }

    /// Flips the check box of row `id` on the current page.
    ///
    /// Returns the new state, or `None` if the row is not on this page.
    pub async fn toggle(&mut self, id: &str) -> Option<bool> {
        let row = self
            .controller
            .rows()
            .iter()
            .find(|row| row.id.as_str() == id)?
            .clone();

        let mut checked = self
            .selection
            .displayed_selection(self.controller.rows())
            .rows()
            .to_vec();
        let now_checked = if self.selection.is_selected(id) {
            checked.retain(|r| r.id != row.id);
            false
        } else {
            checked.push(row);
            true
        };

        self.on_selection_change(&checked).await;
        Some(now_checked)
    }

    /// Replaces the bulk-select input.
    pub fn set_bulk_input(&mut self, input: impl Into<String>) {
        self.selection.set_bulk_input(input);
    }

    /// Returns the bulk-select input.
    pub fn bulk_input(&self) -> &str {
        self.selection.bulk_input()
    }

    /// Runs a bulk selection with the current input.
    ///
    /// The input is cleared when the selection completes.
    pub async fn submit_bulk_input(&mut self) -> Result<BulkOutcome, BulkSelectError> {
        let count = parse_bulk_count(self.selection.bulk_input())?;
        let result = self.select_first(count).await;
        if result.is_ok() {
            self.selection.set_bulk_input("");
        }
        result
    }

    /// Selects the first `count` rows from the top of the current page.
    pub async fn select_first(&mut self, count: usize) -> Result<BulkOutcome, BulkSelectError> {
        let window = *self.controller.window();
        self.bulk
            .select_first(
                self.controller.source().as_ref(),
                &window,
                self.controller.rows(),
                count,
                &mut self.selection,
            )
            .await
    }

    /// Clears the selection and the bulk-select input.
    pub async fn clear(&mut self) -> &SelectionSet {
        self.selection.clear().await
    }

    /// Returns `true` while a bulk selection is running.
    pub fn is_busy(&self) -> bool {
        self.bulk.is_busy()
    }

    /// Returns the selection manager.
    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Returns the pagination controller.
    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    /// Returns the current window.
    pub fn window(&self) -> &PageWindow {
        self.controller.window()
    }

    /// Returns the rows on screen.
    pub fn rows(&self) -> &[Row] {
        self.controller.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemorySource;

    async fn session(rows: usize, page_size: usize) -> (Arc<MemorySource>, TableSession) {
        let source = Arc::new(MemorySource::generated(rows, page_size));
        let session = TableSession::open(source.clone(), None).await;
        (source, session)
    }

    #[tokio::test]
    async fn test_selection_survives_navigation() {
        let (_, mut session) = session(30, 7).await;

        assert_eq!(session.toggle("2").await, Some(true));
        session.next_page().await;
        assert_eq!(session.toggle("9").await, Some(true));
        assert!(session.view().displayed_selection.contains("9"));
        assert!(!session.view().displayed_selection.contains("2"));

        session.prev_page().await;
        let view = session.view();
        assert!(view.displayed_selection.contains("2"));
        assert_eq!(view.displayed_selection.len(), 1);
        assert_eq!(session.selection().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_off_page_row_is_ignored() {
        let (_, mut session) = session(30, 7).await;
        assert_eq!(session.toggle("20").await, None);
        assert!(session.selection().is_empty());
    }

    #[tokio::test]
    async fn test_submit_bulk_input() {
        let (_, mut session) = session(10, 7).await;

        session.set_bulk_input("8");
        let outcome = session.submit_bulk_input().await.unwrap();
        assert_eq!(outcome.selected, 8);
        assert_eq!(session.bulk_input(), "");
        assert!(!session.is_busy());

        assert_eq!(session.view().displayed_selection.len(), 7);
        session.next_page().await;
        assert_eq!(session.view().displayed_selection.len(), 1);
        assert!(session.view().displayed_selection.contains("8"));
    }

    #[tokio::test]
    async fn test_invalid_bulk_input_keeps_selection() {
        let (_, mut session) = session(10, 7).await;
        session.toggle("3").await;

        for input in ["0", "-4", "many", ""] {
            session.set_bulk_input(input);
            assert!(matches!(
                session.submit_bulk_input().await,
                Err(BulkSelectError::InvalidInput(_))
            ));
            assert_eq!(session.bulk_input(), input);
        }
        assert_eq!(session.selection().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let (_, mut session) = session(10, 7).await;
        session.select_first(10).await.unwrap();
        session.set_bulk_input("4");

        assert!(session.clear().await.is_empty());
        assert_eq!(session.bulk_input(), "");
        assert!(session.view().displayed_selection.is_empty());
    }
}
