//! Query state machine

use super::QueryState;
use super::Sort;
use super::SortDirection;
use crate::error::ValidationError;
use crate::model::Value;

/// State machine over a [`QueryState`].
///
/// Every transition that changes the shape of the result set (sort,
/// filters, search, page size) resets the page index to 0; only
/// [`set_page`](Self::set_page) leaves the rest of the state alone.
/// Each mutating method returns `true` if the state actually changed,
/// which is what decides whether a new fetch is committed.
#[derive(Debug, Clone, Default)]
pub struct QueryController {
    state: QueryState,
}

impl QueryController {
    /// Creates a controller with the default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller seeded from an initial state.
    pub fn with_state(state: QueryState) -> Self {
        Self { state }
    }

    /// Returns the current state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Moves to a page. Does not reset any other field.
    pub fn set_page(&mut self, page_index: usize) -> bool {
        if self.state.pagination.page_index == page_index {
            return false;
        }
        self.state.pagination.page_index = page_index;
        true
    }

    /// Changes the page size and resets to the first page.
    ///
    /// A page size of 0 is malformed input and is rejected before it can
    /// reach the remote source.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<bool, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::InvalidPageSize(page_size));
        }
        if self.state.pagination.page_size == page_size {
            return Ok(false);
        }
        self.state.pagination.page_size = page_size;
        self.state.pagination.page_index = 0;
        Ok(true)
    }

    /// Advances the sort cycle for a column: none → asc → desc → none.
    ///
    /// Toggling a different column restarts the cycle at ascending.
    /// Resets to the first page.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        self.state.sort = match self.state.sort.take() {
            Some(sort) if sort.column_id == column_id => match sort.direction {
                SortDirection::Asc => Some(Sort::desc(column_id)),
                SortDirection::Desc => None,
            },
            _ => Some(Sort::asc(column_id)),
        };
        self.state.pagination.page_index = 0;
        true
    }

    /// Sets the filter for a column; a null value removes it.
    /// Resets to the first page if the filter set changed.
    pub fn set_filter(&mut self, column_id: impl Into<String>, value: impl Into<Value>) -> bool {
        let changed = self.state.filters.set(column_id, value);
        if changed {
            self.state.pagination.page_index = 0;
        }
        changed
    }

    /// Removes the filter for a column. Resets to the first page if it
    /// existed.
    pub fn clear_filter(&mut self, column_id: &str) -> bool {
        let changed = self.state.filters.clear(column_id);
        if changed {
            self.state.pagination.page_index = 0;
        }
        changed
    }

    /// Removes all filters. Resets to the first page if any existed.
    pub fn clear_all_filters(&mut self) -> bool {
        let changed = self.state.filters.clear_all();
        if changed {
            self.state.pagination.page_index = 0;
        }
        changed
    }

    /// Commits a search term; an empty term clears the search.
    /// Resets to the first page if the term changed.
    ///
    /// Debouncing happens at the engine boundary before this transition is
    /// reached; the controller itself commits immediately.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        let next = if term.is_empty() { None } else { Some(term) };
        if self.state.search == next {
            return false;
        }
        self.state.search = next;
        self.state.pagination.page_index = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle_round_trips() {
        let mut controller = QueryController::new();
        assert!(controller.state().sort.is_none());

        controller.toggle_sort("name");
        assert_eq!(controller.state().sort, Some(Sort::asc("name")));

        controller.toggle_sort("name");
        assert_eq!(controller.state().sort, Some(Sort::desc("name")));

        controller.toggle_sort("name");
        assert!(controller.state().sort.is_none());
    }

    #[test]
    fn test_toggle_different_column_restarts_at_asc() {
        let mut controller = QueryController::new();
        controller.toggle_sort("name");
        controller.toggle_sort("name");
        controller.toggle_sort("price");
        assert_eq!(controller.state().sort, Some(Sort::asc("price")));
    }

    #[test]
    fn test_shape_changes_reset_page_index() {
        let mut controller = QueryController::new();

        controller.set_page(4);
        controller.toggle_sort("name");
        assert_eq!(controller.state().pagination.page_index, 0);

        controller.set_page(4);
        controller.set_filter("category", 5);
        assert_eq!(controller.state().pagination.page_index, 0);

        controller.set_page(4);
        controller.set_search("widget");
        assert_eq!(controller.state().pagination.page_index, 0);

        controller.set_page(4);
        controller.set_page_size(50).unwrap();
        assert_eq!(controller.state().pagination.page_index, 0);
    }

    #[test]
    fn test_set_page_preserves_other_fields() {
        let mut controller = QueryController::new();
        controller.set_filter("category", 5);
        controller.set_page(3);
        assert_eq!(controller.state().pagination.page_index, 3);
        assert_eq!(controller.state().filters.len(), 1);
    }

    #[test]
    fn test_clear_all_filters_resets_page() {
        let mut controller = QueryController::new();
        controller.set_filter("kategoriId", 5);
        controller.set_page(3);
        controller.clear_all_filters();
        assert!(controller.state().filters.is_empty());
        assert_eq!(controller.state().pagination.page_index, 0);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut controller = QueryController::new();
        assert!(matches!(
            controller.set_page_size(0),
            Err(ValidationError::InvalidPageSize(0))
        ));
        assert_eq!(
            controller.state().pagination.page_size,
            crate::query::Pagination::DEFAULT_PAGE_SIZE
        );
    }

    #[test]
    fn test_empty_search_clears_term() {
        let mut controller = QueryController::new();
        assert!(controller.set_search("widget"));
        assert!(controller.set_search(""));
        assert!(controller.state().search.is_none());
        assert!(!controller.set_search(""));
    }
}
