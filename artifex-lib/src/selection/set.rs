//! Selection set and displayed selection types.

use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::model::Row;
use crate::model::RowId;

/// The full, page-independent set of selected row ids.
///
/// Ids from pages that were never loaded are as valid as ids on screen.
/// Iteration is in id order, which keeps persisted output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RowId>,
}

impl SelectionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selects `id`. Returns `true` if it was not selected before.
    pub fn insert(&mut self, id: RowId) -> bool {
        self.ids.insert(id)
    }

    /// Deselects `id`. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Adds every id in `other`, returning how many were new.
    pub fn union_with(&mut self, other: SelectionSet) -> usize {
        let before = self.ids.len();
        self.ids.extend(other.ids);
        self.ids.len() - before
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the selected ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Projects the set onto `page_rows`.
    pub fn displayed(&self, page_rows: &[Row]) -> DisplayedSelection {
        DisplayedSelection {
            rows: page_rows
                .iter()
                .filter(|row| self.contains(row.id.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Reconciles the set with one page of check boxes.
    ///
    /// Every row on `page_rows` ends up selected if it appears in `checked`
    /// and deselected otherwise. Ids not on `page_rows` are left alone.
    pub fn reconcile_page(&mut self, page_rows: &[Row], checked: &[Row]) {
        let checked: HashSet<&str> = checked.iter().map(|row| row.id.as_str()).collect();

        for row in page_rows {
            if checked.contains(row.id.as_str()) {
                self.ids.insert(row.id.clone());
            } else {
                self.ids.remove(row.id.as_str());
            }
        }
    }
}

impl FromIterator<RowId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<RowId> for SelectionSet {
    fn extend<I: IntoIterator<Item = RowId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a RowId;
    type IntoIter = std::collections::btree_set::Iter<'a, RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Selected rows of the current page, in page order.
///
/// Always derived from a [`SelectionSet`] and the rows currently loaded;
/// never stored across page changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedSelection {
    rows: Vec<Row>,
}

impl DisplayedSelection {
    /// Returns the selected rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns `true` if `id` is among the displayed selected rows.
    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|row| row.id.as_str() == id)
    }

    /// Iterates over the displayed ids.
    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows.iter().map(|row| &row.id)
    }

    /// Returns the number of displayed selected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no row on the page is selected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
