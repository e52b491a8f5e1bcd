//! Contains the [FinalityView], a read-only handle for consumers of finality.

use crate::{reads, LedgerResult};
use alloy_primitives::B256;
use verdict_primitives::{OutputIndex, OutputRecord};
use verdict_store::SharedKeyValueStore;

/// A read-only view of finality.
///
/// Views are cheap to clone and never take the write side of the store lock, so any number of
/// readers may coexist with the single writer.
#[derive(Clone)]
pub struct FinalityView {
    store: SharedKeyValueStore,
}

impl core::fmt::Debug for FinalityView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FinalityView").finish_non_exhaustive()
    }
}

impl FinalityView {
    /// Creates a new [FinalityView] over the given store.
    pub const fn new(store: SharedKeyValueStore) -> Self {
        Self { store }
    }

    /// Returns `true` if the block with the given number is final.
    pub fn is_finalized(&self, number: u64) -> LedgerResult<bool> {
        reads::is_finalized(&*self.store.read(), number)
    }

    /// Returns the number of the latest finalized block.
    pub fn latest_finalized(&self) -> LedgerResult<u64> {
        reads::latest_finalized_number(&*self.store.read())
    }

    /// Returns the live output record for a block number.
    pub fn output_by_number(&self, number: u64) -> LedgerResult<OutputRecord> {
        reads::by_number(&*self.store.read(), number)
    }

    /// Returns the live output record for a block hash.
    pub fn output_by_hash(&self, hash: B256) -> LedgerResult<OutputRecord> {
        reads::by_hash(&*self.store.read(), hash)
    }

    /// Returns the most recently submitted live output record.
    pub fn latest_submitted(&self) -> LedgerResult<OutputRecord> {
        reads::latest_submitted(&*self.store.read())
    }

    /// Returns `true` if the live record at `index` commits to `output_root`.
    pub fn verify_output(&self, index: OutputIndex, output_root: B256) -> LedgerResult<bool> {
        reads::verify_output(&*self.store.read(), index, output_root)
    }

    /// Returns `true` if the live record for block `number` carries `state_root`.
    pub fn verify_state_root(&self, number: u64, state_root: B256) -> LedgerResult<bool> {
        reads::verify_state_root(&*self.store.read(), number, state_root)
    }
}
