//! Result type for one settled fetch

/// One page of rows plus the total row count for the query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<R> {
    rows: Vec<R>,
    total: usize,
}

impl<R> QueryResult<R> {
    /// Creates a result from rows and the total count across all pages.
    pub fn new(rows: Vec<R>, total: usize) -> Self {
        Self { rows, total }
    }

    /// Creates an empty result. Empty is a success, not a failure.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }

    /// Returns the rows of this page.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Consumes the result and returns the rows.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Total row count for the query across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the whole result set is empty.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
