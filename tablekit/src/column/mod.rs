//! Column descriptors, persisted configuration, and the layout manager.
//!
//! A table is described by an immutable [`ColumnSet`] of [`ColumnDescriptor`]s
//! supplied by the caller. Per-table display preferences (visibility, order,
//! pinning, sizing) live in a [`ColumnConfiguration`], which is persisted
//! across sessions through the [`store`](crate::store) module. The
//! [`ColumnLayout`] applies user actions to a configuration while keeping it
//! consistent with the descriptor set.

mod config;
mod descriptor;
mod layout;

pub use config::ColumnConfiguration;
pub use config::Pinning;
pub use descriptor::ColumnDescriptor;
pub use descriptor::ColumnSet;
pub use descriptor::FilterKind;
pub use layout::ColumnLayout;
pub use layout::PartitionedColumns;
pub use layout::PinSide;
pub use layout::SizeBounds;
