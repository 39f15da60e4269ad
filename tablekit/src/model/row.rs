//! Stable row identity

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Stable identity of a row, independent of its position in any page.
///
/// Selection state is keyed by `RowId`, so a row stays selected across
/// pagination, re-sorting, and re-fetches as long as the caller's identity
/// function maps it to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Derives the stable identity of a row.
///
/// Supplied by the caller per table kind. The mapping must be injective
/// within one result set and stable across pages and fetches; a row index
/// is not a valid identity.
///
/// Any `Fn(&R) -> RowId` closure implements this trait.
///
/// # Example
///
/// ```
/// use tablekit::model::{RowId, RowIdentity};
///
/// struct Product {
///     sku: String,
/// }
///
/// let identity = |p: &Product| RowId::new(&p.sku);
/// let row = Product { sku: "A-100".into() };
/// assert_eq!(identity.row_id(&row), RowId::new("A-100"));
/// ```
pub trait RowIdentity<R>: Send + Sync {
    /// Returns the stable id for a row.
    fn row_id(&self, row: &R) -> RowId;
}

impl<R, F> RowIdentity<R> for F
where
    F: Fn(&R) -> RowId + Send + Sync,
{
    fn row_id(&self, row: &R) -> RowId {
        self(row)
    }
}
