//! Contains the [OutputRecord] type and the output root commitment.

use crate::OutputIndex;
use alloy_primitives::{keccak256, Address, B256};

/// The version of the output root commitment scheme.
pub const OUTPUT_ROOT_VERSION: u8 = 0;

/// Computes the output root committed to the settlement ledger for a block.
///
/// **Layout**:
/// | Bytes      | Field              |
/// |------------|--------------------|
/// | [0, 32)    | Version (BE word)  |
/// | [32, 64)   | State root         |
/// | [64, 96)   | Block hash         |
/// | [96, 128)  | Extra data         |
pub fn compute_output_root(state_root: B256, block_hash: B256, extra_data: B256) -> B256 {
    let mut raw_output = [0u8; 128];
    raw_output[31] = OUTPUT_ROOT_VERSION;
    raw_output[32..64].copy_from_slice(state_root.as_slice());
    raw_output[64..96].copy_from_slice(block_hash.as_slice());
    raw_output[96..128].copy_from_slice(extra_data.as_slice());
    keccak256(raw_output)
}

/// A state commitment recorded in the output ledger.
///
/// Records are never physically removed. A record whose block was invalidated is tombstoned
/// (`deleted`), which keeps its [OutputIndex] stable for anything still referring to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputRecord {
    /// The stable arena index of the record.
    pub index: OutputIndex,
    /// The number of the block this record commits to.
    pub block_number: u64,
    /// The hash of the block this record commits to.
    pub block_hash: B256,
    /// The output root.
    pub output_root: B256,
    /// The state root of the block.
    pub state_root: B256,
    /// Extra data folded into the output root (the block's transactions root).
    pub extra_data: B256,
    /// The settlement timestamp of the submission.
    pub submitted_at: u64,
    /// The submitter of the record.
    pub submitter: Address,
    /// Whether the record is final.
    pub finalized: bool,
    /// The settlement timestamp of finalization.
    pub finalized_at: Option<u64>,
    /// Whether the record was deleted because its block was invalidated.
    pub deleted: bool,
}

impl OutputRecord {
    /// Returns `true` unless the record has been deleted.
    pub const fn is_live(&self) -> bool {
        !self.deleted
    }
}
