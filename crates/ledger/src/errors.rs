//! Errors for the `verdict-ledger` crate.

use alloy_primitives::{Address, B256};
use thiserror::Error;
use verdict_primitives::{BlockStatus, OutputIndex};
use verdict_store::StoreError;

/// How an output record was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum OutputLookup {
    /// By arena index.
    #[display("index {_0}")]
    Index(OutputIndex),
    /// By block number.
    #[display("block number {_0}")]
    Number(u64),
    /// By block hash.
    #[display("block hash {_0}")]
    Hash(B256),
    /// The latest finalized record.
    #[display("latest finalized")]
    LatestFinalized,
    /// The most recently submitted live record.
    #[display("latest submitted")]
    LatestSubmitted,
}

/// An error returned by the [OutputLedger].
///
/// [OutputLedger]: crate::OutputLedger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller is not the registered proposer.
    #[error("Unauthorized submitter: {0}")]
    Unauthorized(Address),
    /// The submitted state root is zero.
    #[error("Invalid state root: zero")]
    InvalidRoot,
    /// A live record already exists for the block number.
    #[error("Duplicate block number: {0}")]
    DuplicateBlockNumber(u64),
    /// A record already exists for the block hash.
    #[error("Duplicate block hash: {0}")]
    DuplicateBlockHash(B256),
    /// The record is already final.
    #[error("Output {0} is already finalized")]
    AlreadyFinalized(OutputIndex),
    /// The block owning the record is not finalized.
    #[error("Output {0} is not yet finalizable: owning block is {1}")]
    NotYetFinalizable(OutputIndex, BlockStatus),
    /// The record was deleted.
    #[error("Output {0} was deleted")]
    Deleted(OutputIndex),
    /// No record matches the lookup.
    #[error("Output not found by {0}")]
    NotFound(OutputLookup),
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A [Result] alias for the [LedgerError] type.
pub type LedgerResult<T> = Result<T, LedgerError>;
