//! Errors for the `verdict-coordinator` crate.

use alloy_primitives::{Address, B256};
use thiserror::Error;
use verdict_dispute::DisputeError;
use verdict_ledger::LedgerError;
use verdict_primitives::{BlockStatus, ClaimId, ConfigError, GameId};
use verdict_proof::ProofError;
use verdict_store::StoreError;

/// The class of a [CoordinatorError], telling callers whether to fix the input, retry with other
/// credentials, or give up because the protocol moved past the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request is malformed or conflicts with existing state.
    Validation,
    /// The caller may not perform the request.
    Authorization,
    /// The request came too early, too late, or while the protocol is paused.
    Temporal,
    /// An internal invariant does not hold.
    Invariant,
    /// The backing store failed.
    Storage,
}

/// An error returned by the [Coordinator]. A failed call never changes protocol state.
///
/// [Coordinator]: crate::Coordinator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// The caller does not hold the required role.
    #[error("Unauthorized caller {0} for {1}")]
    Unauthorized(Address, &'static str),
    /// Mutating calls are paused.
    #[error("Protocol is paused")]
    Paused,
    /// The declared block hash does not match the proposal's content.
    #[error("Block hash {0} does not match the proposal")]
    InvalidBlockHash(B256),
    /// The proposed state root is zero.
    #[error("Invalid state root: zero")]
    InvalidRoot,
    /// Block numbers start at 1.
    #[error("Block number must be at least 1")]
    InvalidNumber,
    /// A live block already has this number.
    #[error("Duplicate block number: {0}")]
    DuplicateBlockNumber(u64),
    /// The hash was already proposed.
    #[error("Duplicate block hash: {0}")]
    DuplicateBlockHash(B256),
    /// The parent of the proposal is unknown.
    #[error("Unknown parent block {0}")]
    UnknownParent(B256),
    /// The parent of the proposal does not precede it.
    #[error("Parent {parent} is block #{parent_number}, cannot be the parent of block #{number}")]
    ParentMismatch {
        /// The declared parent hash.
        parent: B256,
        /// The number of the declared parent.
        parent_number: u64,
        /// The number of the proposal.
        number: u64,
    },
    /// The parent of the proposal was invalidated.
    #[error("Parent block {0} was invalidated")]
    ParentInvalidated(B256),
    /// The parent block is not final.
    #[error("Parent block {0} is not finalized")]
    ParentNotFinalized(B256),
    /// A block without transactions must keep its parent's state root.
    #[error("Empty block changes the state root")]
    EmptyBlockStateChange,
    /// Blocks without transactions cannot be challenged.
    #[error("Block {0} has no transactions to dispute")]
    EmptyBlock(B256),
    /// An invalidation cascade has not finished.
    #[error("Invalidation cascade from {0} is in progress")]
    CascadeInProgress(B256),
    /// No block with the given hash exists.
    #[error("Unknown block {0}")]
    UnknownBlock(B256),
    /// No live block with the given number exists.
    #[error("No live block at number {0}")]
    UnknownBlockNumber(u64),
    /// No game with the given id exists.
    #[error("Unknown game {0}")]
    UnknownGame(GameId),
    /// No claim with the given id exists.
    #[error("Unknown claim {0}")]
    UnknownClaim(ClaimId),
    /// The challenge window of the block has elapsed.
    #[error("Challenge window of block {0} expired at {1}")]
    WindowExpired(B256, u64),
    /// The challenge window of the block is still open.
    #[error("Challenge window of block {0} is open until {1}")]
    WindowNotElapsed(B256, u64),
    /// A game over the block is already open.
    #[error("Block {0} is already challenged by game {1}")]
    AlreadyChallenged(B256, GameId),
    /// The game over the block has not been won by the defender.
    #[error("Block {0} is challenged and game {1} is not won by the defender")]
    ChallengePending(B256, GameId),
    /// The requested transition does not leave the block's current state.
    #[error("Cannot {1} block {0} in state {2}")]
    InvalidTransition(B256, &'static str, BlockStatus),
    /// The posted stake is below the minimum.
    #[error("Challenge stake {0} is below the minimum {1}")]
    InsufficientStake(u64, u64),
    /// The proposer may not challenge its own block.
    #[error("Proposer {0} cannot challenge its own block")]
    SelfChallenge(Address),
    /// The caller has no claimable balance.
    #[error("Nothing to withdraw for {0}")]
    NothingToWithdraw(Address),
    /// An internal invariant does not hold.
    #[error("Invariant violated: {0}")]
    Invariant(String),
    /// A dispute game rejected the action.
    #[error(transparent)]
    Dispute(#[from] DisputeError),
    /// A one-step proof does not fit its block.
    #[error(transparent)]
    Proof(#[from] ProofError),
    /// The output ledger rejected the request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    ConfigIo(String),
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoordinatorError {
    /// Returns the [ErrorKind] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(..) | Self::SelfChallenge(_) => ErrorKind::Authorization,
            Self::Paused
            | Self::ParentNotFinalized(_)
            | Self::CascadeInProgress(_)
            | Self::WindowExpired(..)
            | Self::WindowNotElapsed(..)
            | Self::ChallengePending(..) => ErrorKind::Temporal,
            Self::Invariant(_) => ErrorKind::Invariant,
            Self::Store(_) | Self::ConfigIo(_) => ErrorKind::Storage,
            Self::Dispute(e) => match e {
                DisputeError::NotYourTurn(..) => ErrorKind::Authorization,
                DisputeError::WrongPhase(..) | DisputeError::DeadlinePassed { .. } => {
                    ErrorKind::Temporal
                }
                _ => ErrorKind::Validation,
            },
            Self::Ledger(e) => match e {
                LedgerError::Unauthorized(_) => ErrorKind::Authorization,
                LedgerError::AlreadyFinalized(_)
                | LedgerError::NotYetFinalizable(..)
                | LedgerError::Deleted(_) => ErrorKind::Invariant,
                LedgerError::Store(_) => ErrorKind::Storage,
                _ => ErrorKind::Validation,
            },
            _ => ErrorKind::Validation,
        }
    }
}

/// A [Result] alias for the [CoordinatorError] type.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
