//! Errors for the `verdict-dispute` crate.

use crate::GamePhase;
use alloy_primitives::Address;
use thiserror::Error;
use verdict_primitives::GameId;

/// An error returned by a [DisputeGame] action. A failed action never changes the game.
///
/// [DisputeGame]: crate::DisputeGame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisputeError {
    /// The action does not fit the current phase of the game.
    #[error("Game {0} is {1}, expected {2}")]
    WrongPhase(GameId, GamePhase, GamePhase),
    /// The caller is not the party due in this phase.
    #[error("Caller {0} is not due to act in game {1}")]
    NotYourTurn(Address, GameId),
    /// The round deadline has passed.
    #[error("Round deadline {deadline} of game {game} passed at {now}")]
    DeadlinePassed {
        /// The game.
        game: GameId,
        /// The round deadline.
        deadline: u64,
        /// The time of the attempted action.
        now: u64,
    },
    /// The disclosed midpoint is not `floor((start + end) / 2)`.
    #[error("Invalid midpoint: expected {expected}, got {got}")]
    InvalidMidpoint {
        /// The only acceptable midpoint.
        expected: u64,
        /// The disclosed midpoint.
        got: u64,
    },
    /// A disclosed root is zero.
    #[error("Disclosed root must be non-zero")]
    ZeroRoot,
    /// A game cannot be opened over a block without transactions.
    #[error("Cannot dispute a block without transactions")]
    EmptyBlock,
    /// A game cannot be resolved as undecided.
    #[error("Cannot resolve a game as undecided")]
    UndecidedVerdict,
}

/// A [Result] alias for the [DisputeError] type.
pub type DisputeResult<T> = Result<T, DisputeError>;
