//! Preference store error types

/// Errors from the durable preference store.
///
/// A missing or version-mismatched configuration is not an error; the store
/// reports those as `Ok(None)` and the engine falls back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// Failed to serialize a configuration for storage.
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
}
