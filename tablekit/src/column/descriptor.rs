//! Column descriptors and the validated descriptor set

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ValidationError;

/// The filter control kind a column supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Free-text match.
    Text,
    /// Numeric comparison.
    Number,
    /// True/false toggle.
    Boolean,
    /// One of a fixed set of options.
    Select,
}

/// Static definition of one table column.
///
/// Descriptors are pure data supplied by the caller and immutable for the
/// lifetime of a table instance. All display preferences live in
/// [`ColumnConfiguration`](super::ColumnConfiguration) instead.
///
/// # Example
///
/// ```
/// use tablekit::column::{ColumnDescriptor, FilterKind};
///
/// let name = ColumnDescriptor::new("name", "Name")
///     .sortable()
///     .filterable(FilterKind::Text);
///
/// let select = ColumnDescriptor::new("select", "").sticky();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable header label.
    pub label: String,
    /// Whether the column participates in the sort cycle.
    pub sortable: bool,
    /// Whether the column accepts a filter value.
    pub filterable: bool,
    /// Filter control kind, if filterable.
    pub filter_kind: Option<FilterKind>,
    /// Initial width in pixels.
    pub default_size: f32,
    /// Sticky columns (selection/action columns) are exempt from
    /// reordering, pinning, and visibility toggles.
    pub sticky: bool,
}

impl ColumnDescriptor {
    /// Default column width in pixels.
    pub const DEFAULT_SIZE: f32 = 150.0;

    /// Creates a plain column: not sortable, not filterable, not sticky.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sortable: false,
            filterable: false,
            filter_kind: None,
            default_size: Self::DEFAULT_SIZE,
            sticky: false,
        }
    }

    /// Marks the column as sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Marks the column as filterable with the given filter kind.
    pub fn filterable(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter_kind = Some(kind);
        self
    }

    /// Sets the initial width in pixels.
    pub fn size(mut self, px: f32) -> Self {
        self.default_size = px;
        self
    }

    /// Marks the column as sticky.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

/// A validated, ordered set of column descriptors.
///
/// Construction rejects duplicate ids and empty sets; afterwards the set is
/// immutable and shared by everything that needs to resolve a column id.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
}

impl ColumnSet {
    /// Creates a column set, validating id uniqueness.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, ValidationError> {
        if columns.is_empty() {
            return Err(ValidationError::EmptyColumnSet);
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if index.insert(column.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateColumnId(column.id.clone()));
            }
        }

        Ok(Self { columns, index })
    }

    /// Returns the descriptor for an id, if it exists.
    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.index.get(id).map(|&i| &self.columns[i])
    }

    /// Returns `true` if the id names a column in this set.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns `true` if the id names a sticky column.
    ///
    /// Unknown ids are not sticky.
    pub fn is_sticky(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.sticky)
    }

    /// Iterates descriptors in their declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Iterates column ids in their declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the set is empty (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = ColumnSet::new(vec![
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("name", "Other"),
        ]);
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateColumnId(id)) if id == "name"
        ));
    }

    #[test]
    fn test_rejects_empty_set() {
        assert!(matches!(
            ColumnSet::new(vec![]),
            Err(ValidationError::EmptyColumnSet)
        ));
    }

    #[test]
    fn test_lookup_and_sticky() {
        let set = ColumnSet::new(vec![
            ColumnDescriptor::new("select", "").sticky(),
            ColumnDescriptor::new("name", "Name").sortable(),
        ])
        .unwrap();

        assert!(set.contains("name"));
        assert!(!set.contains("missing"));
        assert!(set.is_sticky("select"));
        assert!(!set.is_sticky("name"));
        assert!(!set.is_sticky("missing"));
        assert!(set.get("name").unwrap().sortable);
    }
}
