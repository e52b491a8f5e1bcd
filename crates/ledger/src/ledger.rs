//! Contains the [OutputLedger], the single writer of output records.

use crate::{reads, FinalityView, LedgerError, LedgerResult};
use alloy_primitives::{Address, B256};
use tracing::{debug, info, warn};
use verdict_primitives::{compute_output_root, BlockStatus, OutputIndex, OutputRecord};
use verdict_store::{MetaSlot, SharedKeyValueStore, StoreKey, TypedStore};

/// The output ledger.
///
/// Records are appended by the registered proposer and afterwards only finalized or deleted on
/// behalf of the coordinator, which owns the lifecycle of the corresponding blocks.
#[derive(Clone)]
pub struct OutputLedger {
    store: SharedKeyValueStore,
    proposer: Address,
}

impl core::fmt::Debug for OutputLedger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutputLedger").field("proposer", &self.proposer).finish_non_exhaustive()
    }
}

impl OutputLedger {
    /// Creates a new [OutputLedger] over the given store.
    pub const fn new(store: SharedKeyValueStore, proposer: Address) -> Self {
        Self { store, proposer }
    }

    /// Returns the registered proposer.
    pub const fn proposer(&self) -> Address {
        self.proposer
    }

    /// Replaces the registered proposer.
    pub fn set_proposer(&mut self, proposer: Address) {
        info!(target: "output-ledger", "Registered proposer changed from {} to {}", self.proposer, proposer);
        self.proposer = proposer;
    }

    /// Returns a read-only [FinalityView] over the ledger.
    pub fn view(&self) -> FinalityView {
        FinalityView::new(self.store.clone())
    }

    /// Appends an output record for a block and returns its arena index.
    pub fn submit(
        &mut self,
        caller: Address,
        state_root: B256,
        block_hash: B256,
        block_number: u64,
        extra_data: B256,
        now: u64,
    ) -> LedgerResult<OutputIndex> {
        if caller != self.proposer {
            return Err(LedgerError::Unauthorized(caller));
        }
        if state_root.is_zero() {
            return Err(LedgerError::InvalidRoot);
        }

        let mut kv = self.store.write();
        if reads::live_index_at(&*kv, block_number)?.is_some() {
            return Err(LedgerError::DuplicateBlockNumber(block_number));
        }
        if kv.get_typed::<OutputIndex>(StoreKey::output_hash(block_hash))?.is_some() {
            return Err(LedgerError::DuplicateBlockHash(block_hash));
        }

        let index: OutputIndex =
            kv.get_typed(StoreKey::meta(MetaSlot::NextOutputIndex))?.unwrap_or_default();
        let record = OutputRecord {
            index,
            block_number,
            block_hash,
            output_root: compute_output_root(state_root, block_hash, extra_data),
            state_root,
            extra_data,
            submitted_at: now,
            submitter: caller,
            finalized: false,
            finalized_at: None,
            deleted: false,
        };

        kv.set_typed(StoreKey::output(index), &record)?;
        kv.set_typed(StoreKey::output_number(block_number), &Some(index))?;
        kv.set_typed(StoreKey::output_hash(block_hash), &index)?;
        kv.set_typed(StoreKey::meta(MetaSlot::NextOutputIndex), &index.next())?;

        debug!(
            target: "output-ledger",
            "Recorded output {} for block #{} ({}), root {}",
            index, block_number, block_hash, record.output_root
        );
        Ok(index)
    }

    /// Marks a record final once its owning block is Finalized.
    pub fn finalize(
        &mut self,
        index: OutputIndex,
        owner_status: BlockStatus,
        now: u64,
    ) -> LedgerResult<()> {
        let mut kv = self.store.write();
        let mut record = reads::by_index(&*kv, index)?;
        if record.deleted {
            return Err(LedgerError::Deleted(index));
        }
        if record.finalized {
            return Err(LedgerError::AlreadyFinalized(index));
        }
        if owner_status != BlockStatus::Finalized {
            return Err(LedgerError::NotYetFinalizable(index, owner_status));
        }

        record.finalized = true;
        record.finalized_at = Some(now);
        kv.set_typed(StoreKey::output(index), &record)?;

        let latest = reads::latest_finalized_number(&*kv)?;
        if record.block_number > latest {
            kv.set_typed(StoreKey::meta(MetaSlot::LatestFinalized), &record.block_number)?;
        }

        info!(target: "output-ledger", "Finalized output {} for block #{}", index, record.block_number);
        Ok(())
    }

    /// Tombstones the record of an invalidated block.
    ///
    /// Deleting an already deleted record is a no-op. The hash index is kept so that a hash is
    /// never accepted twice.
    pub fn delete(&mut self, index: OutputIndex) -> LedgerResult<()> {
        let mut kv = self.store.write();
        let mut record = reads::by_index(&*kv, index)?;
        if record.deleted {
            return Ok(());
        }
        if record.finalized {
            return Err(LedgerError::AlreadyFinalized(index));
        }

        record.deleted = true;
        kv.set_typed(StoreKey::output(index), &record)?;

        if reads::live_index_at(&*kv, record.block_number)? == Some(index) {
            kv.set_typed(StoreKey::output_number(record.block_number), &None::<OutputIndex>)?;
        }

        warn!(target: "output-ledger", "Deleted output {} for block #{}", index, record.block_number);
        Ok(())
    }

    /// Moves the latest finalized pointer back to `number` if it is currently ahead of it.
    pub fn rewind_finalized(&mut self, number: u64) -> LedgerResult<()> {
        let mut kv = self.store.write();
        let latest = reads::latest_finalized_number(&*kv)?;
        if latest > number {
            kv.set_typed(StoreKey::meta(MetaSlot::LatestFinalized), &number)?;
            warn!(target: "output-ledger", "Rewound latest finalized from #{} to #{}", latest, number);
        }
        Ok(())
    }

    /// Returns the record at the given arena index, including tombstones.
    pub fn by_index(&self, index: OutputIndex) -> LedgerResult<OutputRecord> {
        reads::by_index(&*self.store.read(), index)
    }

    /// Returns the live record for a block number.
    pub fn by_number(&self, number: u64) -> LedgerResult<OutputRecord> {
        reads::by_number(&*self.store.read(), number)
    }

    /// Returns the live record for a block hash.
    pub fn by_hash(&self, hash: B256) -> LedgerResult<OutputRecord> {
        reads::by_hash(&*self.store.read(), hash)
    }

    /// Returns `true` if a record, live or deleted, was ever submitted for `hash`.
    pub fn contains_hash(&self, hash: B256) -> LedgerResult<bool> {
        Ok(self.store.read().get_typed::<OutputIndex>(StoreKey::output_hash(hash))?.is_some())
    }

    /// Returns the highest-numbered finalized record.
    pub fn latest_finalized(&self) -> LedgerResult<OutputRecord> {
        reads::latest_finalized(&*self.store.read())
    }

    /// Returns the number of the latest finalized block. Genesis is block `0`.
    pub fn latest_finalized_number(&self) -> LedgerResult<u64> {
        reads::latest_finalized_number(&*self.store.read())
    }

    /// Returns `true` if the block with the given number is final.
    pub fn is_finalized(&self, number: u64) -> LedgerResult<bool> {
        reads::is_finalized(&*self.store.read(), number)
    }

    /// Returns the most recently submitted record that has not been deleted.
    pub fn latest_submitted(&self) -> LedgerResult<OutputRecord> {
        reads::latest_submitted(&*self.store.read())
    }

    /// Returns `true` if the live record at `index` commits to `output_root`.
    ///
    /// Deleted records and unknown indices never verify. Finality is a separate question, see
    /// [Self::is_finalized].
    pub fn verify_output(&self, index: OutputIndex, output_root: B256) -> LedgerResult<bool> {
        reads::verify_output(&*self.store.read(), index, output_root)
    }

    /// Returns `true` if the live record for block `number` carries `state_root`.
    pub fn verify_state_root(&self, number: u64, state_root: B256) -> LedgerResult<bool> {
        reads::verify_state_root(&*self.store.read(), number, state_root)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::OutputLookup;
    use alloy_primitives::address;
    use verdict_store::{shared, MemoryKeyValueStore};

    const PROPOSER: Address = address!("00000000000000000000000000000000000000b0");

    fn ledger() -> OutputLedger {
        OutputLedger::new(shared(MemoryKeyValueStore::new()), PROPOSER)
    }

    fn submit(ledger: &mut OutputLedger, number: u64) -> OutputIndex {
        ledger
            .submit(
                PROPOSER,
                B256::with_last_byte(number as u8),
                B256::repeat_byte(number as u8),
                number,
                B256::ZERO,
                100,
            )
            .unwrap()
    }

    #[test]
    fn test_submit_validation() {
        let mut ledger = ledger();
        let stranger = address!("0000000000000000000000000000000000000bad");
        assert_eq!(
            ledger.submit(stranger, B256::with_last_byte(1), B256::ZERO, 1, B256::ZERO, 0),
            Err(LedgerError::Unauthorized(stranger))
        );
        assert_eq!(
            ledger.submit(PROPOSER, B256::ZERO, B256::ZERO, 1, B256::ZERO, 0),
            Err(LedgerError::InvalidRoot)
        );

        assert_eq!(submit(&mut ledger, 1), OutputIndex(0));
        assert_eq!(
            ledger.submit(PROPOSER, B256::with_last_byte(9), B256::repeat_byte(9), 1, B256::ZERO, 0),
            Err(LedgerError::DuplicateBlockNumber(1))
        );
        assert_eq!(
            ledger.submit(PROPOSER, B256::with_last_byte(9), B256::repeat_byte(1), 2, B256::ZERO, 0),
            Err(LedgerError::DuplicateBlockHash(B256::repeat_byte(1)))
        );
    }

    #[test]
    fn test_lookups() {
        let mut ledger = ledger();
        let index = submit(&mut ledger, 1);

        let record = ledger.by_number(1).unwrap();
        assert_eq!(record.index, index);
        assert_eq!(ledger.by_hash(B256::repeat_byte(1)).unwrap(), record);
        assert_eq!(
            record.output_root,
            compute_output_root(record.state_root, record.block_hash, B256::ZERO)
        );
        assert_eq!(ledger.by_number(2), Err(LedgerError::NotFound(OutputLookup::Number(2))));
        assert_eq!(
            ledger.latest_finalized(),
            Err(LedgerError::NotFound(OutputLookup::LatestFinalized))
        );
    }

    #[test]
    fn test_finalize() {
        let mut ledger = ledger();
        let index = submit(&mut ledger, 1);

        assert_eq!(
            ledger.finalize(index, BlockStatus::Proposed, 200),
            Err(LedgerError::NotYetFinalizable(index, BlockStatus::Proposed))
        );
        ledger.finalize(index, BlockStatus::Finalized, 200).unwrap();
        assert_eq!(
            ledger.finalize(index, BlockStatus::Finalized, 300),
            Err(LedgerError::AlreadyFinalized(index))
        );

        let latest = ledger.latest_finalized().unwrap();
        assert_eq!(latest.finalized_at, Some(200));
        assert_eq!(ledger.latest_finalized_number(), Ok(1));
        assert_eq!(ledger.is_finalized(0), Ok(true));
        assert_eq!(ledger.is_finalized(1), Ok(true));
        assert_eq!(ledger.is_finalized(2), Ok(false));
    }

    #[test]
    fn test_delete_tombstones_and_frees_number() {
        let mut ledger = ledger();
        let first = submit(&mut ledger, 1);
        let second = submit(&mut ledger, 2);

        ledger.delete(second).unwrap();
        ledger.delete(second).unwrap();
        assert!(ledger.by_index(second).unwrap().deleted);
        assert_eq!(ledger.by_number(2), Err(LedgerError::NotFound(OutputLookup::Number(2))));
        assert!(ledger.contains_hash(B256::repeat_byte(2)).unwrap());
        assert_eq!(
            ledger.finalize(second, BlockStatus::Finalized, 0),
            Err(LedgerError::Deleted(second))
        );

        // The number is free again; the arena index is not reused.
        let replacement = ledger
            .submit(PROPOSER, B256::with_last_byte(7), B256::repeat_byte(7), 2, B256::ZERO, 0)
            .unwrap();
        assert_eq!(replacement, OutputIndex(2));
        assert_eq!(ledger.by_number(2).unwrap().index, replacement);

        ledger.finalize(first, BlockStatus::Finalized, 0).unwrap();
        assert_eq!(ledger.delete(first), Err(LedgerError::AlreadyFinalized(first)));
    }

    #[test]
    fn test_rewind_finalized() {
        let mut ledger = ledger();
        let one = submit(&mut ledger, 1);
        let two = submit(&mut ledger, 2);
        ledger.finalize(one, BlockStatus::Finalized, 0).unwrap();
        ledger.finalize(two, BlockStatus::Finalized, 0).unwrap();

        ledger.rewind_finalized(5).unwrap();
        assert_eq!(ledger.latest_finalized_number(), Ok(2));
        ledger.rewind_finalized(1).unwrap();
        assert_eq!(ledger.latest_finalized_number(), Ok(1));
    }

    #[test]
    fn test_verify_output_and_state_root() {
        let mut ledger = ledger();
        let one = submit(&mut ledger, 1);
        let two = submit(&mut ledger, 2);
        let record = ledger.by_index(two).unwrap();

        assert_eq!(ledger.verify_output(two, record.output_root), Ok(true));
        assert_eq!(ledger.verify_output(one, record.output_root), Ok(false));
        assert_eq!(ledger.verify_output(OutputIndex(9), record.output_root), Ok(false));
        assert_eq!(ledger.verify_state_root(2, B256::with_last_byte(2)), Ok(true));
        assert_eq!(ledger.verify_state_root(2, B256::with_last_byte(1)), Ok(false));
        assert_eq!(ledger.verify_state_root(3, B256::with_last_byte(3)), Ok(false));

        ledger.delete(two).unwrap();
        assert_eq!(ledger.verify_output(two, record.output_root), Ok(false));
        assert_eq!(ledger.verify_state_root(2, B256::with_last_byte(2)), Ok(false));
    }

    #[test]
    fn test_latest_submitted_skips_deleted_records() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.latest_submitted(),
            Err(LedgerError::NotFound(OutputLookup::LatestSubmitted))
        );

        let one = submit(&mut ledger, 1);
        let two = submit(&mut ledger, 2);
        let three = submit(&mut ledger, 3);
        assert_eq!(ledger.latest_submitted().unwrap().index, three);

        ledger.delete(three).unwrap();
        ledger.delete(two).unwrap();
        assert_eq!(ledger.latest_submitted().unwrap().index, one);

        ledger.delete(one).unwrap();
        assert_eq!(
            ledger.latest_submitted(),
            Err(LedgerError::NotFound(OutputLookup::LatestSubmitted))
        );
    }

    #[test]
    fn test_set_proposer() {
        let mut ledger = ledger();
        let next = address!("00000000000000000000000000000000000000b1");
        ledger.set_proposer(next);
        assert_eq!(ledger.proposer(), next);
        assert_eq!(
            ledger.submit(PROPOSER, B256::with_last_byte(1), B256::ZERO, 1, B256::ZERO, 0),
            Err(LedgerError::Unauthorized(PROPOSER))
        );
    }
}
