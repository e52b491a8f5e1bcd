//! Errors for the `verdict-participant` crate.

use alloy_primitives::B256;
use thiserror::Error;
use verdict_primitives::GameId;
use verdict_proof::ProofError;

/// An error encountered by a participant client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    /// The transactions do not hash to the block's transactions root.
    #[error("Transactions of block {block} hash to {computed}, expected {expected}")]
    TransactionsMismatch {
        /// The block hash.
        block: B256,
        /// The transactions root in the block.
        expected: B256,
        /// The root of the supplied transactions.
        computed: B256,
    },
    /// The trace does not cover the game's block.
    #[error("Trace of {got} transactions does not fit a block of {expected}")]
    TraceLength {
        /// The number of transactions in the block.
        expected: u64,
        /// The number of roots in the trace.
        got: u64,
    },
    /// Re-executing a transaction failed.
    #[error("Re-execution of transaction {0} failed: {1}")]
    Execution(u64, String),
    /// The client has no trace for the game's block.
    #[error("No trace for block {1} of game {0}")]
    UnknownBlock(GameId, B256),
    /// Building a proof failed.
    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// A [Result] alias for the [ParticipantError] type.
pub type ParticipantResult<T> = Result<T, ParticipantError>;
