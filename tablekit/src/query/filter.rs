//! Opaque per-column filter values

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// One filter entry: a column id and an opaque value.
///
/// The engine never interprets the value; it is forwarded to the remote
/// source as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column the filter applies to.
    pub column_id: String,
    /// Opaque filter value.
    pub value: Value,
}

/// The active filters, at most one per column.
///
/// Insertion order is preserved for stable rendering of filter chips, but
/// has no query semantics: the canonical fetch key sorts entries by column
/// id, so two filter sets with the same entries in a different order are
/// the same remote request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    entries: Vec<ColumnFilter>,
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter for a column, replacing any existing entry.
    ///
    /// A [`Value::Null`] removes the entry instead. Returns `true` if the
    /// set changed.
    pub fn set(&mut self, column_id: impl Into<String>, value: impl Into<Value>) -> bool {
        let column_id = column_id.into();
        let value = value.into();
        if value.is_null() {
            return self.clear(&column_id);
        }
        match self.entries.iter_mut().find(|f| f.column_id == column_id) {
            Some(existing) => {
                if existing.value == value {
                    false
                } else {
                    existing.value = value;
                    true
                }
            }
            None => {
                self.entries.push(ColumnFilter { column_id, value });
                true
            }
        }
    }

    /// Removes the filter for a column. Returns `true` if one was removed.
    pub fn clear(&mut self, column_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|f| f.column_id != column_id);
        self.entries.len() != before
    }

    /// Removes all filters. Returns `true` if any were removed.
    pub fn clear_all(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        true
    }

    /// Returns the value for a column, if filtered.
    pub fn get(&self, column_id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| &f.value)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.entries.iter()
    }

    /// Returns the number of active filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_entry() {
        let mut filters = FilterSet::new();
        assert!(filters.set("category", 5));
        assert!(filters.set("category", 7));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("category"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let mut filters = FilterSet::new();
        filters.set("category", 5);
        assert!(!filters.set("category", 5));
    }

    #[test]
    fn test_null_value_removes_entry() {
        let mut filters = FilterSet::new();
        filters.set("category", 5);
        assert!(filters.set("category", Value::Null));
        assert!(filters.is_empty());
        assert!(!filters.set("other", Value::Null));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut filters = FilterSet::new();
        filters.set("b", 1);
        filters.set("a", 2);
        let ids: Vec<_> = filters.iter().map(|f| f.column_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
