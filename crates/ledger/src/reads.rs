//! Lookups shared by the [OutputLedger] and the [FinalityView].
//!
//! [OutputLedger]: crate::OutputLedger
//! [FinalityView]: crate::FinalityView

use crate::{LedgerError, LedgerResult, OutputLookup};
use alloy_primitives::B256;
use verdict_primitives::{OutputIndex, OutputRecord};
use verdict_store::{KeyValueStore, MetaSlot, StoreKey, TypedStore};

pub(crate) fn by_index(kv: &dyn KeyValueStore, index: OutputIndex) -> LedgerResult<OutputRecord> {
    kv.get_typed(StoreKey::output(index))?
        .ok_or(LedgerError::NotFound(OutputLookup::Index(index)))
}

/// The number index is cleared by writing `null`, since records are never physically removed.
pub(crate) fn live_index_at(
    kv: &dyn KeyValueStore,
    number: u64,
) -> LedgerResult<Option<OutputIndex>> {
    Ok(kv.get_typed::<Option<OutputIndex>>(StoreKey::output_number(number))?.flatten())
}

pub(crate) fn by_number(kv: &dyn KeyValueStore, number: u64) -> LedgerResult<OutputRecord> {
    let index = live_index_at(kv, number)?
        .ok_or(LedgerError::NotFound(OutputLookup::Number(number)))?;
    by_index(kv, index)
}

pub(crate) fn by_hash(kv: &dyn KeyValueStore, hash: B256) -> LedgerResult<OutputRecord> {
    let index: OutputIndex = kv
        .get_typed(StoreKey::output_hash(hash))?
        .ok_or(LedgerError::NotFound(OutputLookup::Hash(hash)))?;
    let record = by_index(kv, index)?;
    if record.deleted {
        return Err(LedgerError::NotFound(OutputLookup::Hash(hash)));
    }
    Ok(record)
}

pub(crate) fn latest_finalized_number(kv: &dyn KeyValueStore) -> LedgerResult<u64> {
    Ok(kv.get_typed(StoreKey::meta(MetaSlot::LatestFinalized))?.unwrap_or_default())
}

pub(crate) fn latest_finalized(kv: &dyn KeyValueStore) -> LedgerResult<OutputRecord> {
    let number = latest_finalized_number(kv)?;
    match by_number(kv, number) {
        Ok(record) if record.finalized => Ok(record),
        _ => Err(LedgerError::NotFound(OutputLookup::LatestFinalized)),
    }
}

pub(crate) fn is_finalized(kv: &dyn KeyValueStore, number: u64) -> LedgerResult<bool> {
    if number == 0 {
        return Ok(true);
    }
    match by_number(kv, number) {
        Ok(record) => Ok(record.finalized),
        Err(LedgerError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Scans back from the newest arena slot. Cascades tombstone a suffix of the arena, so the scan
/// only walks past the records of the most recent cascade.
pub(crate) fn latest_submitted(kv: &dyn KeyValueStore) -> LedgerResult<OutputRecord> {
    let next: OutputIndex =
        kv.get_typed(StoreKey::meta(MetaSlot::NextOutputIndex))?.unwrap_or_default();
    for slot in (0..next.0).rev() {
        let record = by_index(kv, OutputIndex(slot))?;
        if !record.deleted {
            return Ok(record);
        }
    }
    Err(LedgerError::NotFound(OutputLookup::LatestSubmitted))
}

pub(crate) fn verify_output(
    kv: &dyn KeyValueStore,
    index: OutputIndex,
    output_root: B256,
) -> LedgerResult<bool> {
    match by_index(kv, index) {
        Ok(record) => Ok(!record.deleted && record.output_root == output_root),
        Err(LedgerError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

pub(crate) fn verify_state_root(
    kv: &dyn KeyValueStore,
    number: u64,
    state_root: B256,
) -> LedgerResult<bool> {
    match by_number(kv, number) {
        Ok(record) => Ok(record.state_root == state_root),
        Err(LedgerError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
