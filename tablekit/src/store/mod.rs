//! Durable column-configuration store.
//!
//! Column configurations are persisted across sessions keyed by `table_id`.
//! The [`PreferenceStore`] wraps a raw byte [`StoreBackend`] with a
//! versioned bincode envelope: a version mismatch or an undecodable payload
//! is treated as "no prior configuration" and falls back to defaults, never
//! a fatal error.
//!
//! The store may be written by multiple table instances of the same kind
//! concurrently (two tabs, two panes); last writer wins, no cross-instance
//! locking.

mod backend;
mod memory;
mod sqlite;

pub use backend::StoreBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::column::ColumnConfiguration;
use crate::error::StoreError;

/// Version of the persisted configuration envelope.
///
/// Bump when `ColumnConfiguration`'s serialized shape changes; readers of
/// older envelopes fall back to defaults.
pub const CONFIG_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    config: ColumnConfiguration,
}

/// Typed, versioned store for column configurations.
///
/// Cheap to clone; wraps the backend in an `Arc`.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn StoreBackend>,
}

impl PreferenceStore {
    /// Creates a store over the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Loads the configuration for a table kind.
    ///
    /// Returns `Ok(None)` when nothing was saved, the envelope version
    /// doesn't match, or the payload can't be decoded.
    pub async fn load(&self, table_id: &str) -> Result<Option<ColumnConfiguration>, StoreError> {
        let Some(bytes) = self.backend.get_bytes(table_id).await? else {
            return Ok(None);
        };
        match bincode::deserialize::<Envelope>(&bytes) {
            Ok(envelope) if envelope.version == CONFIG_VERSION => Ok(Some(envelope.config)),
            Ok(envelope) => {
                log::debug!(
                    "discarding configuration for '{table_id}': version {} != {CONFIG_VERSION}",
                    envelope.version
                );
                Ok(None)
            }
            Err(e) => {
                log::warn!("discarding undecodable configuration for '{table_id}': {e}");
                Ok(None)
            }
        }
    }

    /// Saves the configuration for a table kind. Last writer wins.
    pub async fn save(
        &self,
        table_id: &str,
        config: &ColumnConfiguration,
    ) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: CONFIG_VERSION,
            config: config.clone(),
        };
        let bytes = bincode::serialize(&envelope).map_err(StoreError::Serialization)?;
        self.backend.set_bytes(table_id, bytes).await
    }

    /// Removes the saved configuration for a table kind.
    pub async fn remove(&self, table_id: &str) -> Result<(), StoreError> {
        self.backend.delete(table_id).await
    }
}
