//! Errors for the `verdict-proof` crate.

use alloy_primitives::B256;
use thiserror::Error;

/// An error returned when a [OneStepProof] does not fit the block it targets.
///
/// [OneStepProof]: crate::OneStepProof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The proof targets a different transaction than the one in dispute.
    #[error("Proof targets transaction {got}, expected {expected}")]
    IndexMismatch {
        /// The disputed transaction index.
        expected: u64,
        /// The index the proof targets.
        got: u64,
    },
    /// The leaf index is outside the block.
    #[error("Leaf index {index} out of range for {leaf_count} transactions")]
    IndexOutOfRange {
        /// The leaf index.
        index: u64,
        /// The number of transactions.
        leaf_count: u64,
    },
    /// The number of siblings does not match the depth of the tree.
    #[error("Inclusion proof has {got} siblings, expected {expected}")]
    InvalidProofLength {
        /// The depth of the tree.
        expected: usize,
        /// The number of supplied siblings.
        got: usize,
    },
    /// The inclusion proof does not lead to the transactions root.
    #[error("Inclusion proof computes root {computed}, expected {expected}")]
    RootMismatch {
        /// The block's transactions root.
        expected: B256,
        /// The root computed from the proof.
        computed: B256,
    },
    /// The disputed transaction is empty.
    #[error("Transaction payload is empty")]
    EmptyTransaction,
}

/// A [Result] alias for the [ProofError] type.
pub type ProofResult<T> = Result<T, ProofError>;
