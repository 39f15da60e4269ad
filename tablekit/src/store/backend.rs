//! Store backend trait.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend trait for configuration storage.
///
/// Implementations handle raw byte storage/retrieval keyed by table id.
/// The [`PreferenceStore`](super::PreferenceStore) wraps this with the
/// versioned envelope.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
