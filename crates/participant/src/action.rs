//! Contains the [Action] type produced by participant clients.

use alloy_primitives::{Bytes, B256};
use verdict_primitives::{GameId, Half};
use verdict_proof::OneStepProof;

/// A protocol call a participant wants submitted on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Challenge a Proposed block.
    Challenge {
        /// The block hash.
        block: B256,
        /// The stake to post.
        stake: u64,
    },
    /// Disclose the root at the midpoint of a game's interval.
    RespondBisection {
        /// The game.
        game: GameId,
        /// The midpoint index.
        mid_index: u64,
        /// The root after transaction `mid_index - 1`.
        mid_root: B256,
        /// Auxiliary proof data.
        proof: Bytes,
    },
    /// Select the disputed half of a game's interval.
    SelectHalf {
        /// The game.
        game: GameId,
        /// The half still in dispute.
        half: Half,
    },
    /// Settle a converged game.
    SubmitOneStepProof {
        /// The game.
        game: GameId,
        /// The proof for the disputed transaction.
        proof: OneStepProof,
    },
}

impl Action {
    /// Returns the game the action targets, if any.
    pub const fn game(&self) -> Option<GameId> {
        match self {
            Self::Challenge { .. } => None,
            Self::RespondBisection { game, .. }
            | Self::SelectHalf { game, .. }
            | Self::SubmitOneStepProof { game, .. } => Some(*game),
        }
    }
}
