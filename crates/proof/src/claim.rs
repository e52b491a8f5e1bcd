//! Contains the [FraudProofClaim] type and the [OneStepProof] submitted to create it.

use crate::{MerkleProof, ProofError, ProofResult};
use alloc::string::String;
use alloy_primitives::{Address, Bytes, B256};
use core::fmt::{Display, Formatter};
use verdict_primitives::{ClaimId, GameId, Verdict};

/// The evidence for the disputed transaction of a converged game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneStepProof {
    /// The serialized transaction.
    pub transaction: Bytes,
    /// The inclusion proof of the transaction in the block's transactions root.
    pub inclusion: MerkleProof,
    /// Auxiliary trace data handed to the re-execution oracle.
    pub witness: Bytes,
}

impl OneStepProof {
    /// Checks that the proof carries transaction `tx_index` of a block with the given
    /// transactions root and transaction count.
    pub fn check(&self, tx_root: B256, tx_count: u64, tx_index: u64) -> ProofResult<()> {
        if self.transaction.is_empty() {
            return Err(ProofError::EmptyTransaction);
        }
        if self.inclusion.index != tx_index {
            return Err(ProofError::IndexMismatch { expected: tx_index, got: self.inclusion.index });
        }
        self.inclusion.verify(tx_root, &self.transaction, tx_count)
    }
}

/// Why a challenger won an adjudication.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChallengerWinReason {
    /// Re-execution produced a different root than the defender claimed.
    RootMismatch,
    /// Re-execution failed, which counts as evidence of fraud.
    ExecutionFailed(String),
}

/// The outcome of a [FraudProofClaim].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClaimOutcome {
    /// Not yet adjudicated.
    #[default]
    Pending,
    /// Re-execution matched the defender's root.
    DefenderWins,
    /// The defender's root was shown to be wrong.
    ChallengerWins(ChallengerWinReason),
}

impl ClaimOutcome {
    /// Returns the game [Verdict] this outcome implies.
    pub const fn verdict(&self) -> Verdict {
        match self {
            Self::Pending => Verdict::Undecided,
            Self::DefenderWins => Verdict::DefenderWins,
            Self::ChallengerWins(_) => Verdict::ChallengerWins,
        }
    }

    /// Returns `true` once the claim has been adjudicated.
    pub const fn is_adjudicated(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for ClaimOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::DefenderWins => write!(f, "defender wins"),
            Self::ChallengerWins(ChallengerWinReason::RootMismatch) => {
                write!(f, "challenger wins: root mismatch")
            }
            Self::ChallengerWins(ChallengerWinReason::ExecutionFailed(reason)) => {
                write!(f, "challenger wins: execution failed ({reason})")
            }
        }
    }
}

/// A request to adjudicate the single disputed transaction of a game.
///
/// A claim is adjudicated at most once. Its outcome and computed root are only ever written by
/// the [FraudProofVerifier], after which the claim is immutable.
///
/// [FraudProofVerifier]: crate::FraudProofVerifier
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FraudProofClaim {
    /// The claim id.
    pub id: ClaimId,
    /// The game the claim settles.
    pub game: GameId,
    /// The hash of the contested block.
    pub block: B256,
    /// The index of the disputed transaction.
    pub tx_index: u64,
    /// The last agreed root, before the disputed transaction.
    pub pre_state_root: B256,
    /// The defender's claimed root after the disputed transaction.
    pub defender_post_root: B256,
    /// The serialized transaction.
    pub transaction: Bytes,
    /// Auxiliary trace data for the oracle.
    pub witness: Bytes,
    /// The submitter of the proof.
    pub submitted_by: Address,
    /// The settlement timestamp of the submission.
    pub submitted_at: u64,
    computed_post_root: Option<B256>,
    outcome: ClaimOutcome,
}

impl FraudProofClaim {
    /// Creates a pending claim.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        id: ClaimId,
        game: GameId,
        block: B256,
        tx_index: u64,
        pre_state_root: B256,
        defender_post_root: B256,
        transaction: Bytes,
        witness: Bytes,
        submitted_by: Address,
        submitted_at: u64,
    ) -> Self {
        Self {
            id,
            game,
            block,
            tx_index,
            pre_state_root,
            defender_post_root,
            transaction,
            witness,
            submitted_by,
            submitted_at,
            computed_post_root: None,
            outcome: ClaimOutcome::Pending,
        }
    }

    /// Returns the root computed by re-execution, if it succeeded.
    pub const fn computed_post_root(&self) -> Option<B256> {
        self.computed_post_root
    }

    /// Returns the outcome.
    pub const fn outcome(&self) -> &ClaimOutcome {
        &self.outcome
    }

    pub(crate) fn record(&mut self, computed_post_root: Option<B256>, outcome: ClaimOutcome) {
        self.computed_post_root = computed_post_root;
        self.outcome = outcome;
    }
}
