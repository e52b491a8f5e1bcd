//! This module contains the [KeyValueStore] trait and concrete implementations of it.

use alloy_primitives::B256;
use anyhow::Result;
use std::sync::Arc;

mod mem;
pub use mem::MemoryKeyValueStore;

mod staged;
pub use staged::StagedKeyValueStore;

#[cfg(feature = "disk")]
mod disk;
#[cfg(feature = "disk")]
pub use disk::DiskKeyValueStore;

/// A [KeyValueStore] shared between the components of a single protocol instance.
pub type SharedKeyValueStore = Arc<spin::RwLock<dyn KeyValueStore + Send + Sync>>;

/// Wraps a [KeyValueStore] into a [SharedKeyValueStore] handle.
pub fn shared<S>(store: S) -> SharedKeyValueStore
where
    S: KeyValueStore + Send + Sync + 'static,
{
    Arc::new(spin::RwLock::new(store))
}

/// Describes the interface of a simple, synchronous key-value store.
pub trait KeyValueStore {
    /// Get the value associated with the given key.
    ///
    /// A missing key is `Ok(None)`. A backend that cannot answer returns an error.
    fn get(&self, key: B256) -> Result<Option<Vec<u8>>>;

    /// Set the value associated with the given key.
    fn set(&mut self, key: B256, value: Vec<u8>) -> Result<()>;

    /// Writes every pair of `batch`, or none of them if the write fails.
    fn set_batch(&mut self, batch: Vec<(B256, Vec<u8>)>) -> Result<()>;
}
