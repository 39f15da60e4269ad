//! Column layout manager: applies user actions to a configuration

use std::collections::HashSet;
use std::sync::Arc;

use super::ColumnConfiguration;
use super::ColumnDescriptor;
use super::ColumnSet;

/// Which edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    /// Pinned to the left edge.
    Left,
    /// Pinned to the right edge.
    Right,
}

/// Clamp range for user-driven column resizing, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    /// Minimum width.
    pub min: f32,
    /// Maximum width.
    pub max: f32,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 1200.0,
        }
    }
}

impl SizeBounds {
    /// Clamps a width into the bounds.
    pub fn clamp(&self, px: f32) -> f32 {
        px.clamp(self.min, self.max)
    }
}

/// Visible columns split into pin buckets.
///
/// Every visible column appears in exactly one bucket; order within each
/// bucket follows the configuration's order list.
#[derive(Debug, Clone, Default)]
pub struct PartitionedColumns {
    /// Columns pinned to the left edge.
    pub left: Vec<ColumnDescriptor>,
    /// Unpinned columns.
    pub center: Vec<ColumnDescriptor>,
    /// Columns pinned to the right edge.
    pub right: Vec<ColumnDescriptor>,
}

impl PartitionedColumns {
    /// Total number of visible columns across all buckets.
    pub fn len(&self) -> usize {
        self.left.len() + self.center.len() + self.right.len()
    }

    /// Returns `true` if no column is visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates all visible columns left-to-right.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.left
            .iter()
            .chain(self.center.iter())
            .chain(self.right.iter())
    }
}

/// Maintains a [`ColumnConfiguration`] against a fixed [`ColumnSet`].
///
/// All operations are total: unknown ids and operations on sticky columns
/// are silent no-ops. Each mutating operation reports whether it changed
/// the configuration, so the caller knows when to persist.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Arc<ColumnSet>,
    config: ColumnConfiguration,
    bounds: SizeBounds,
}

impl ColumnLayout {
    /// Creates a layout with the default configuration.
    pub fn new(columns: Arc<ColumnSet>) -> Self {
        let config = ColumnConfiguration::default_for(&columns);
        Self {
            columns,
            config,
            bounds: SizeBounds::default(),
        }
    }

    /// Creates a layout from a previously persisted configuration.
    ///
    /// The configuration is sanitized against the descriptor set first.
    pub fn with_config(columns: Arc<ColumnSet>, mut config: ColumnConfiguration) -> Self {
        config.sanitize(&columns);
        Self {
            columns,
            config,
            bounds: SizeBounds::default(),
        }
    }

    /// Overrides the resize clamp range.
    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns the descriptor set.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ColumnConfiguration {
        &self.config
    }

    /// Restores the default configuration.
    pub fn reset(&mut self) -> bool {
        let default = ColumnConfiguration::default_for(&self.columns);
        if self.config == default {
            return false;
        }
        self.config = default;
        true
    }

    /// Shows or hides a column. No-op for sticky or unknown ids.
    pub fn set_visibility(&mut self, id: &str, visible: bool) -> bool {
        if !self.columns.contains(id) || self.columns.is_sticky(id) {
            return false;
        }
        if self.config.is_visible(id) == visible {
            return false;
        }
        if visible {
            self.config.visibility.remove(id);
        } else {
            self.config.visibility.insert(id.to_string(), false);
        }
        true
    }

    /// Applies a new ordering over the non-sticky columns.
    ///
    /// Walks `new_order`, taking each known non-sticky id once (duplicates
    /// and unknown ids are ignored), then appends the columns absent from
    /// `new_order` in their previous relative order. Sticky columns keep
    /// their fixed positions: those declared at the front of the descriptor
    /// set stay first, the rest go last. The result is always a total,
    /// duplicate-free ordering over the descriptor set.
    pub fn reorder(&mut self, new_order: &[&str]) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ordered: Vec<String> = Vec::with_capacity(self.columns.len());

        for &id in new_order {
            if self.columns.contains(id) && !self.columns.is_sticky(id) && seen.insert(id) {
                ordered.push(id.to_string());
            }
        }
        // Absentees keep their previous relative order.
        let previous = self.config.order.clone();
        for id in &previous {
            if !self.columns.is_sticky(id) && !seen.contains(id.as_str()) {
                seen.insert(id);
                ordered.push(id.clone());
            }
        }
        // Splice sticky columns back at their fixed edges.
        let mut result: Vec<String> = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter().take_while(|c| c.sticky) {
            result.push(column.id.clone());
        }
        let leading = result.len();
        result.extend(ordered);
        for column in self.columns.iter().skip(leading).filter(|c| c.sticky) {
            result.push(column.id.clone());
        }

        if result == self.config.order {
            return false;
        }
        self.config.order = result;
        true
    }

    /// Pins a column to one edge, or unpins it with `None`.
    ///
    /// The id is removed from both pin lists before being appended to the
    /// requested side, so a column is never pinned on both sides. No-op for
    /// sticky or unknown ids.
    pub fn set_pin(&mut self, id: &str, side: Option<PinSide>) -> bool {
        if !self.columns.contains(id) || self.columns.is_sticky(id) {
            return false;
        }
        let before = self.config.pinning.clone();
        self.config.pinning.remove(id);
        match side {
            Some(PinSide::Left) => self.config.pinning.left.push(id.to_string()),
            Some(PinSide::Right) => self.config.pinning.right.push(id.to_string()),
            None => {}
        }
        self.config.pinning != before
    }

    /// Resizes a column, clamped to the configured bounds.
    ///
    /// Non-positive and non-finite widths are rejected as a no-op.
    pub fn set_size(&mut self, id: &str, px: f32) -> bool {
        if !self.columns.contains(id) || !px.is_finite() || px <= 0.0 {
            return false;
        }
        let clamped = self.bounds.clamp(px);
        if self.config.sizing.get(id) == Some(&clamped) {
            return false;
        }
        self.config.sizing.insert(id.to_string(), clamped);
        true
    }

    /// Splits the visible columns into pin buckets.
    pub fn partition(&self) -> PartitionedColumns {
        let mut partitioned = PartitionedColumns::default();
        for id in &self.config.order {
            let Some(column) = self.columns.get(id) else {
                continue;
            };
            if !self.config.is_visible(id) {
                continue;
            }
            if self.config.pinning.left.iter().any(|c| c == id) {
                partitioned.left.push(column.clone());
            } else if self.config.pinning.right.iter().any(|c| c == id) {
                partitioned.right.push(column.clone());
            } else {
                partitioned.center.push(column.clone());
            }
        }
        partitioned
    }

    /// Replaces the configuration wholesale, sanitizing it first.
    pub(crate) fn replace_config(&mut self, mut config: ColumnConfiguration) {
        config.sanitize(&self.columns);
        self.config = config;
    }
}
