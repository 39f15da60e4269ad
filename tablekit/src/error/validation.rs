//! Caller input validation errors

/// Malformed caller input, rejected synchronously before any fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Page size must be at least 1.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Two column descriptors share the same id.
    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(String),

    /// The descriptor set is empty.
    #[error("Column set must contain at least one column")]
    EmptyColumnSet,

    /// A table id must be a non-empty string.
    #[error("Table id must not be empty")]
    EmptyTableId,
}
