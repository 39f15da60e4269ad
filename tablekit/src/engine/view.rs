//! Derived view state exposed to UI collaborators

use std::sync::Arc;

use crate::error::FetchError;
use crate::query::QueryState;

/// A point-in-time snapshot of everything a view needs to render rows.
///
/// Rows are shared behind an `Arc`, so taking a snapshot never copies row
/// data. Snapshots are immutable; take a new one after dispatching actions.
#[derive(Debug, Clone)]
pub struct TableView<R> {
    /// Rows of the current page, in server order.
    pub rows: Arc<Vec<R>>,
    /// Total row count across all pages for the current query.
    pub total: usize,
    /// The query state these rows were (or are being) fetched for.
    pub query: QueryState,
    /// A fetch is in flight.
    pub is_loading: bool,
    /// No successful result has settled yet for this table instance.
    pub is_initial_loading: bool,
    /// The last settled fetch succeeded with `total == 0`.
    pub is_empty: bool,
    /// The last settled fetch failed.
    ///
    /// Unauthorized failures never appear here; they are escalated to the
    /// session guard instead. The previous rows and column configuration
    /// are retained alongside an error so only the row area needs to switch
    /// to an error presentation.
    pub error: Option<FetchError>,
}

impl<R> TableView<R> {
    /// Returns `true` if the last settled fetch failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of pages for the current query, given its page size.
    pub fn page_count(&self) -> usize {
        self.query.pagination.page_count(self.total)
    }
}
