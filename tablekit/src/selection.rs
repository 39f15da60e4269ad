//! Identity-keyed row selection.
//!
//! Selection is keyed by [`RowId`], never by row position, so it survives
//! pagination, re-sorting, and filter changes. The model also remembers
//! every id it has observed on settled pages, which is what
//! [`toggle_all_known`](SelectionModel::toggle_all_known) operates on: the
//! engine never holds the full dataset, so "all" can only mean "all rows
//! seen so far".

use std::collections::HashSet;

use crate::model::RowId;

/// Tracks selected row identities for one table instance.
///
/// Selection is cleared only by an explicit [`clear`](Self::clear); no
/// query transition touches it.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: HashSet<RowId>,
    /// Ids observed on settled pages, in first-seen order.
    known: Vec<RowId>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the ids of a settled page so they count as "known".
    pub fn observe_page(&mut self, ids: &[RowId]) {
        for id in ids {
            if !self.known.contains(id) {
                self.known.push(id.clone());
            }
        }
    }

    /// Toggles one row's membership.
    pub fn toggle_row(&mut self, id: RowId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Selects or deselects every id of the current page.
    ///
    /// Only the given page's ids are touched; selections made on other
    /// pages are left intact.
    pub fn toggle_page(&mut self, ids: &[RowId], value: bool) {
        for id in ids {
            if value {
                self.selected.insert(id.clone());
            } else {
                self.selected.remove(id);
            }
        }
    }

    /// Selects or deselects every id observed so far across visited pages.
    pub fn toggle_all_known(&mut self, value: bool) {
        if value {
            self.selected.extend(self.known.iter().cloned());
        } else {
            for id in &self.known {
                self.selected.remove(id);
            }
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` iff every id of the page is selected.
    ///
    /// An empty page has no selectable rows, so this is `false`.
    pub fn is_all_page_selected(&self, page_ids: &[RowId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.selected.contains(id))
    }

    /// Returns `true` iff at least one but not all page ids are selected.
    ///
    /// Drives the indeterminate state of a header checkbox.
    pub fn is_some_page_selected(&self, page_ids: &[RowId]) -> bool {
        let selected = page_ids
            .iter()
            .filter(|id| self.selected.contains(id))
            .count();
        selected > 0 && selected < page_ids.len()
    }

    /// Returns the selected ids in arbitrary order.
    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selected.iter().cloned().collect()
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
