//! Page window

use crate::api::DatasetTotals;

/// Which slice of the dataset is on screen.
///
/// Once navigation settles, `first_offset == (page_number - 1) * page_size`.
/// The totals come from their own request and may briefly lag the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page, 1-based.
    pub page_number: usize,
    /// Fixed rows per page.
    pub page_size: usize,
    /// Dataset offset of the first row on screen.
    pub first_offset: usize,
    /// Total pages, 0 while unknown.
    pub total_pages: usize,
    /// Total rows, 0 while unknown.
    pub total_rows: usize,
}

impl PageWindow {
    /// Creates a window on page 1 with unknown totals.
    pub fn new(page_size: usize) -> Self {
        Self::at_page(page_size, 1)
    }

    /// Creates a settled window on `page`.
    pub fn at_page(page_size: usize, page: usize) -> Self {
        let page_size = page_size.max(1);
        let page_number = page.max(1);
        Self {
            page_number,
            page_size,
            first_offset: (page_number - 1).saturating_mul(page_size),
            total_pages: 0,
            total_rows: 0,
        }
    }

    /// Returns a copy with the given totals.
    pub fn with_totals(mut self, totals: DatasetTotals) -> Self {
        self.total_pages = totals.total_pages;
        self.total_rows = totals.total_rows;
        self
    }

    /// Dataset offset of the first row of `page`, saturating at `usize::MAX`.
    pub fn offset_of(&self, page: usize) -> usize {
        page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Returns `true` if the offset matches the page number.
    pub fn is_settled(&self) -> bool {
        self.first_offset == self.offset_of(self.page_number)
    }

    /// Index within the loaded page of the row at `first_offset`.
    pub fn local_start(&self) -> usize {
        self.first_offset
            .saturating_sub(self.offset_of(self.page_number))
    }

    /// Returns `true` if the totals report a page after this one.
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Returns `true` if there is a page before this one.
    pub fn has_prev_page(&self) -> bool {
        self.page_number > 1
    }

    /// Clamps `page` to `1..=total_pages` (only the lower bound while totals are unknown).
    pub fn clamp_page(&self, page: usize) -> usize {
        let page = page.max(1);
        if self.total_pages > 0 {
            page.min(self.total_pages)
        } else {
            page
        }
    }
}
