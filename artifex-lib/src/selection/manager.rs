//! Selection set manager.

use super::DisplayedSelection;
use super::SelectionSet;
use crate::model::Row;
use crate::model::RowId;
use crate::store::PersistOutcome;
use crate::store::SelectionStore;

/// Owns the [`SelectionSet`] and writes it through to a [`SelectionStore`].
///
/// Every mutation persists the whole set. Persistence failures are logged
/// and never undo the in-memory change.
///
/// # Example
///
/// ```ignore
/// use artifex_lib::selection::SelectionManager;
///
/// let mut selection = SelectionManager::new();
/// selection.toggle_rows(&page_rows, &page_rows[..1]).await;
/// assert!(selection.is_selected(page_rows[0].id.as_str()));
/// ```
pub struct SelectionManager {
    set: SelectionSet,
    store: Option<SelectionStore>,
    bulk_input: String,
}

impl SelectionManager {
    /// Creates a manager with no persistence.
    pub fn new() -> Self {
        Self {
            set: SelectionSet::new(),
            store: None,
            bulk_input: String::new(),
        }
    }

    /// Creates a manager that persists to `store`.
    ///
    /// Call [`restore`](Self::restore) before mutating; until then the store
    /// refuses writes.
    pub fn with_store(store: SelectionStore) -> Self {
        Self {
            set: SelectionSet::new(),
            store: Some(store),
            bulk_input: String::new(),
        }
    }

    /// Loads the persisted selection, replacing the in-memory set.
    pub async fn restore(&mut self) -> &SelectionSet {
        if let Some(store) = self.store.as_mut() {
            self.set = store.load().await;
        }
        &self.set
    }

    /// Applies one page's check box state.
    ///
    /// Rows of `page_rows` found in `checked` are selected, the others
    /// deselected; selections on other pages are untouched.
    pub async fn toggle_rows(&mut self, page_rows: &[Row], checked: &[Row]) -> &SelectionSet {
        self.set.reconcile_page(page_rows, checked);
        self.persist().await;
        &self.set
    }

    /// Adds `ids` to the selection, returning how many were new.
    pub async fn extend(&mut self, ids: SelectionSet) -> usize {
        let added = self.set.union_with(ids);
        self.persist().await;
        added
    }

    /// Deselects everything and discards any pending bulk-select input.
    pub async fn clear(&mut self) -> &SelectionSet {
        self.set.clear();
        self.bulk_input.clear();
        self.persist().await;
        &self.set
    }

    /// Selected rows of `page_rows`. Pure.
    pub fn displayed_selection(&self, page_rows: &[Row]) -> DisplayedSelection {
        self.set.displayed(page_rows)
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    /// Returns the full selection.
    pub fn set(&self) -> &SelectionSet {
        &self.set
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns the pending bulk-select input.
    pub fn bulk_input(&self) -> &str {
        &self.bulk_input
    }

    /// Replaces the pending bulk-select input.
    pub fn set_bulk_input(&mut self, input: impl Into<String>) {
        self.bulk_input = input.into();
    }

    /// Iterates over the selected ids.
    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.set.iter()
    }

    async fn persist(&self) {
        let Some(store) = &self.store else { return };

        match store.save(&self.set).await {
            Ok(PersistOutcome::Saved) => {
                log::debug!("Saved {} selected row(s) to '{}'", self.set.len(), store.key());
            }
            Ok(PersistOutcome::SkippedBeforeLoad) => {
                log::debug!("Selection not saved: '{}' has not been loaded", store.key());
            }
            Err(e) => log::error!("Error saving selection to '{}': {}", store.key(), e),
        }
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}
