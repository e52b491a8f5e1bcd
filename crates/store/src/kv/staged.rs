//! Contains a [KeyValueStore] that buffers writes in memory until they are committed to a backing
//! store in a single batch.

use super::{KeyValueStore, SharedKeyValueStore};
use alloy_primitives::B256;
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A write-buffering layer over a [SharedKeyValueStore].
///
/// Reads see staged writes first and fall through to the backing store. [Self::commit] hands every
/// staged write to [KeyValueStore::set_batch], so a group of related writes reaches the backing
/// store together or not at all. [Self::discard] drops them.
#[derive(Clone)]
pub struct StagedKeyValueStore {
    backing: SharedKeyValueStore,
    staged: BTreeMap<B256, Vec<u8>>,
}

impl core::fmt::Debug for StagedKeyValueStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StagedKeyValueStore").field("staged", &self.staged.len()).finish()
    }
}

impl StagedKeyValueStore {
    /// Creates an empty staging layer over `backing`.
    pub const fn new(backing: SharedKeyValueStore) -> Self {
        Self { backing, staged: BTreeMap::new() }
    }

    /// Returns the backing store.
    pub const fn backing(&self) -> &SharedKeyValueStore {
        &self.backing
    }

    /// Returns the number of staged writes.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Writes every staged value to the backing store in one batch and returns how many were
    /// written. The staging layer is empty afterwards, even if the backing store failed.
    pub fn commit(&mut self) -> Result<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }
        let batch: Vec<_> = core::mem::take(&mut self.staged).into_iter().collect();
        let written = batch.len();
        self.backing.write().set_batch(batch)?;
        trace!(target: "store", "Committed {} staged writes", written);
        Ok(written)
    }

    /// Drops every staged write and returns how many were dropped.
    pub fn discard(&mut self) -> usize {
        let dropped = self.staged.len();
        if dropped > 0 {
            debug!(target: "store", "Discarded {} staged writes", dropped);
        }
        self.staged.clear();
        dropped
    }
}

impl KeyValueStore for StagedKeyValueStore {
    fn get(&self, key: B256) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.staged.get(&key) {
            return Ok(Some(value.clone()));
        }
        self.backing.read().get(key)
    }

    fn set(&mut self, key: B256, value: Vec<u8>) -> Result<()> {
        self.staged.insert(key, value);
        Ok(())
    }

    fn set_batch(&mut self, batch: Vec<(B256, Vec<u8>)>) -> Result<()> {
        self.staged.extend(batch);
        Ok(())
    }
}
