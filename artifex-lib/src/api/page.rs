//! Page and dataset total types.

use crate::model::Row;

/// One page of rows as returned by a [`PageSource`](super::PageSource).
///
/// Pages are numbered from 1. Rows keep the order the source returned them
/// in; that order is what "the first N rows" is measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    number: usize,
    rows: Vec<Row>,
}

impl Page {
    /// Creates a page.
    pub fn new(number: usize, rows: Vec<Row>) -> Self {
        Self { number, rows }
    }

    /// Returns the page number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the rows on this page.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the page and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Authoritative size of the remote dataset.
///
/// Fetched separately from page content and never derived from a page
/// payload, so it can be briefly stale relative to the rows on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetTotals {
    /// Total number of rows.
    pub total_rows: usize,
    /// Total number of pages at the source's page size.
    pub total_pages: usize,
}

impl DatasetTotals {
    /// Creates totals from a row and page count.
    pub fn new(total_rows: usize, total_pages: usize) -> Self {
        Self {
            total_rows,
            total_pages,
        }
    }

    /// Computes totals for `total_rows` split into pages of `page_size`.
    pub fn from_rows(total_rows: usize, page_size: usize) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_rows.div_ceil(page_size)
        };
        Self {
            total_rows,
            total_pages,
        }
    }

    /// Returns `true` if the dataset is empty or the totals are unknown.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_from_rows() {
        assert_eq!(DatasetTotals::from_rows(10, 7), DatasetTotals::new(10, 2));
        assert_eq!(DatasetTotals::from_rows(14, 7), DatasetTotals::new(14, 2));
        assert_eq!(DatasetTotals::from_rows(0, 7), DatasetTotals::new(0, 0));
        assert!(DatasetTotals::from_rows(5, 0).is_empty());
    }

    #[test]
    fn test_page_keeps_row_order() {
        let page = Page::new(2, vec![Row::new("8", "a"), Row::new("9", "b")]);
        let ids: Vec<&str> = page.rows().iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["8", "9"]);
        assert_eq!(page.number(), 2);
        assert_eq!(page.len(), 2);
    }
}
