//! Table widget input.

use super::LoadState;
use crate::model::Row;
use crate::selection::DisplayedSelection;

/// Everything the table widget needs to render one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Rows of the current page.
    pub rows: Vec<Row>,
    /// Which of those rows are checked.
    pub displayed_selection: DisplayedSelection,
    /// Fixed rows per page.
    pub page_size: usize,
    /// Dataset offset of the first row.
    pub first_offset: usize,
    /// Total rows in the dataset, 0 while unknown.
    pub total_records: usize,
    /// Current page, 1-based.
    pub page_number: usize,
    /// Total pages, 0 while unknown.
    pub total_pages: usize,
    /// Load state of the page.
    pub state: LoadState,
}

impl TableView {
    /// Returns `true` if `row` should render as checked.
    pub fn is_checked(&self, row: &Row) -> bool {
        self.displayed_selection.contains(row.id.as_str())
    }

    /// 1-based inclusive range of the rows shown, if any.
    pub fn row_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        Some((self.first_offset + 1, self.first_offset + self.rows.len()))
    }
}
