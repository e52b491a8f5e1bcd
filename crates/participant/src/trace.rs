//! Contains the [ExecutionTrace] of a block.

use crate::{ParticipantError, ParticipantResult};
use alloy_primitives::{keccak256, Bytes, B256};
use tracing::trace;
use verdict_proof::{MerkleProof, OneStepProof, ReexecutionOracle};

/// The state roots a participant believes in for every position of a block.
///
/// Position `0` is the pre-state root, the post-state root of the parent block. Position `i` for
/// `i >= 1` is the root after transaction `i - 1`, so the last position holds the block's
/// post-state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    pre_state_root: B256,
    roots: Vec<B256>,
}

impl ExecutionTrace {
    /// Creates a trace from explicit roots, one per transaction.
    pub const fn new(pre_state_root: B256, roots: Vec<B256>) -> Self {
        Self { pre_state_root, roots }
    }

    /// Builds the honest trace of `transactions` by executing each of them in order.
    pub async fn replay<O, T>(
        oracle: &O,
        pre_state_root: B256,
        transactions: &[T],
    ) -> ParticipantResult<Self>
    where
        O: ReexecutionOracle + Send + Sync,
        T: AsRef<[u8]>,
    {
        let mut roots = Vec::with_capacity(transactions.len());
        let mut root = pre_state_root;
        for (index, transaction) in transactions.iter().enumerate() {
            root = oracle
                .execute(root, transaction.as_ref(), &[])
                .await
                .map_err(|e| ParticipantError::Execution(index as u64, e.to_string()))?;
            trace!(target: "participant", "Replayed transaction {}: {}", index, root);
            roots.push(root);
        }
        Ok(Self { pre_state_root, roots })
    }

    /// Returns the number of transactions the trace covers.
    pub fn len(&self) -> u64 {
        self.roots.len() as u64
    }

    /// Returns `true` if the trace covers no transactions.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the root at `position`, or `None` past the end of the block.
    pub fn root_at(&self, position: u64) -> Option<B256> {
        match position {
            0 => Some(self.pre_state_root),
            _ => self.roots.get(position as usize - 1).copied(),
        }
    }

    /// Returns the post-state root of the block.
    pub fn post_state_root(&self) -> B256 {
        self.roots.last().copied().unwrap_or(self.pre_state_root)
    }

    /// Returns the first transaction whose post-state root differs between `self` and `other`.
    pub fn first_divergence(&self, other: &Self) -> Option<u64> {
        self.roots.iter().zip(other.roots.iter()).position(|(a, b)| a != b).map(|i| i as u64)
    }

    /// Returns a copy of the trace whose roots from transaction `from` onward are replaced by
    /// roots derived from `seed`. Used to model a proposer that misreports execution.
    pub fn corrupted_from(&self, from: u64, seed: B256) -> Self {
        let roots = self
            .roots
            .iter()
            .enumerate()
            .map(|(index, root)| {
                if (index as u64) < from {
                    *root
                } else {
                    keccak256([seed.as_slice(), root.as_slice()].concat())
                }
            })
            .collect();
        Self { pre_state_root: self.pre_state_root, roots }
    }
}

/// The transactions of a block together with the trace a participant holds for them.
#[derive(Debug, Clone)]
pub(crate) struct TracedBlock {
    pub(crate) transactions: Vec<Bytes>,
    pub(crate) trace: ExecutionTrace,
}

impl TracedBlock {
    /// Reveals transaction `tx_index` with its inclusion proof against the transactions root.
    pub(crate) fn one_step_proof(&self, tx_index: u64) -> ParticipantResult<OneStepProof> {
        let inclusion = MerkleProof::build(&self.transactions, tx_index)?;
        let transaction = self.transactions.get(tx_index as usize).cloned().ok_or(
            ParticipantError::TraceLength {
                expected: tx_index + 1,
                got: self.transactions.len() as u64,
            },
        )?;
        Ok(OneStepProof { transaction, inclusion, witness: Bytes::new() })
    }
}
