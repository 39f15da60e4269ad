//! Persisted per-table column configuration

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::ColumnSet;

/// Pin partition: which columns are fixed to each edge.
///
/// A column id appears in at most one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pinning {
    /// Columns pinned to the left edge.
    pub left: Vec<String>,
    /// Columns pinned to the right edge.
    pub right: Vec<String>,
}

impl Pinning {
    /// Returns `true` if the id is pinned on either side.
    pub fn contains(&self, id: &str) -> bool {
        self.left.iter().any(|c| c == id) || self.right.iter().any(|c| c == id)
    }

    /// Removes the id from both sides.
    pub fn remove(&mut self, id: &str) {
        self.left.retain(|c| c != id);
        self.right.retain(|c| c != id);
    }
}

/// Display preferences for one table kind, persisted across sessions.
///
/// Every id referenced here must exist in the table's [`ColumnSet`]; loaded
/// configurations are sanitized against the current descriptor set before
/// use, so descriptor drift between sessions degrades to defaults for the
/// affected columns rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfiguration {
    /// Per-column visibility. Absence means visible.
    pub visibility: HashMap<String, bool>,
    /// Total ordering over all column ids.
    pub order: Vec<String>,
    /// Pin partition.
    pub pinning: Pinning,
    /// Per-column width in pixels. Absence means the descriptor default.
    pub sizing: HashMap<String, f32>,
}

impl ColumnConfiguration {
    /// Creates the default configuration for a descriptor set: everything
    /// visible, declaration order, nothing pinned, descriptor sizes.
    pub fn default_for(columns: &ColumnSet) -> Self {
        Self {
            visibility: HashMap::new(),
            order: columns.ids().map(str::to_string).collect(),
            pinning: Pinning::default(),
            sizing: columns
                .iter()
                .map(|c| (c.id.clone(), c.default_size))
                .collect(),
        }
    }

    /// Returns whether a column is visible. Absence means visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.visibility.get(id).copied().unwrap_or(true)
    }

    /// Returns the configured width for a column, falling back to the
    /// descriptor default.
    pub fn size_of(&self, id: &str, columns: &ColumnSet) -> f32 {
        self.sizing.get(id).copied().unwrap_or_else(|| {
            columns
                .get(id)
                .map(|c| c.default_size)
                .unwrap_or(super::ColumnDescriptor::DEFAULT_SIZE)
        })
    }

    /// Prunes references to ids missing from the descriptor set and repairs
    /// the order list so it stays a total, duplicate-free ordering.
    ///
    /// Applied to configurations loaded from the durable store, where the
    /// descriptor set may have changed since the configuration was saved.
    pub fn sanitize(&mut self, columns: &ColumnSet) {
        self.visibility.retain(|id, _| columns.contains(id));
        self.sizing.retain(|id, _| columns.contains(id));
        self.pinning
            .left
            .retain(|id| columns.contains(id) && !columns.is_sticky(id));
        self.pinning
            .right
            .retain(|id| columns.contains(id) && !columns.is_sticky(id));

        let mut seen = std::collections::HashSet::new();
        self.order
            .retain(|id| columns.contains(id) && seen.insert(id.clone()));
        for id in columns.ids() {
            if !seen.contains(id) {
                self.order.push(id.to_string());
            }
        }

        // Sticky columns cannot be hidden.
        for column in columns.iter() {
            if column.sticky {
                self.visibility.remove(&column.id);
            }
        }
    }
}
