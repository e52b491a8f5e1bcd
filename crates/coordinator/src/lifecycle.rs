//! The block finalization state machine.
//!
//! ```text
//! NonExistent -> Proposed -> Finalized
//!                   |
//!                   +------> Challenged -> Finalized    (defender wins)
//!                                      \-> Invalidated  (challenger wins, or an ancestor did)
//! ```
//!
//! A block that was never proposed has no record, so `NonExistent` is the absence of a [Block].
//! A Proposed block whose ancestor is invalidated moves straight to Invalidated by cascade.

use crate::{CoordinatorError, CoordinatorResult};
use verdict_primitives::{Block, BlockStatus, GameId, Verdict};

/// The effect of a lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The block moved to a new state.
    Applied,
    /// The block was already in the target state.
    Unchanged,
}

/// Why a block is being invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Invalidation {
    /// The game over the block reached the given verdict.
    Verdict(Verdict),
    /// An ancestor of the block was invalidated.
    Ancestor,
}

/// `Proposed -> Challenged`, strictly before the challenge deadline.
pub(crate) fn challenge(block: &mut Block, game: GameId, now: u64) -> CoordinatorResult<()> {
    match block.status {
        BlockStatus::Proposed => {}
        BlockStatus::Challenged => {
            let open = block.game.unwrap_or(game);
            return Err(CoordinatorError::AlreadyChallenged(block.hash(), open));
        }
        status => return Err(CoordinatorError::InvalidTransition(block.hash(), "challenge", status)),
    }
    if block.window_elapsed(now) {
        return Err(CoordinatorError::WindowExpired(block.hash(), block.deadline));
    }
    if block.proposal.tx_count == 0 {
        return Err(CoordinatorError::EmptyBlock(block.hash()));
    }

    block.status = BlockStatus::Challenged;
    block.game = Some(game);
    Ok(())
}

/// Checks whether the block may be finalized at `now` without changing it.
///
/// `verdict` is the verdict of the block's game, if it has one. Finality is only ever granted on
/// top of a finalized parent, so it never has to be revoked.
pub(crate) fn check_finalize(
    block: &Block,
    verdict: Option<Verdict>,
    parent_finalized: bool,
    now: u64,
) -> CoordinatorResult<Transition> {
    match block.status {
        BlockStatus::Finalized => return Ok(Transition::Unchanged),
        BlockStatus::Invalidated => {
            return Err(CoordinatorError::InvalidTransition(
                block.hash(),
                "finalize",
                BlockStatus::Invalidated,
            ))
        }
        BlockStatus::Proposed => {
            if !block.window_elapsed(now) {
                return Err(CoordinatorError::WindowNotElapsed(block.hash(), block.deadline));
            }
        }
        BlockStatus::Challenged => {
            if verdict != Some(Verdict::DefenderWins) {
                let game = block.game.unwrap_or_default();
                return Err(CoordinatorError::ChallengePending(block.hash(), game));
            }
        }
    }
    if !parent_finalized {
        return Err(CoordinatorError::ParentNotFinalized(block.parent_hash()));
    }
    Ok(Transition::Applied)
}

/// `Proposed | Challenged -> Finalized`.
pub(crate) fn finalize(
    block: &mut Block,
    verdict: Option<Verdict>,
    parent_finalized: bool,
    now: u64,
) -> CoordinatorResult<Transition> {
    let transition = check_finalize(block, verdict, parent_finalized, now)?;
    if transition == Transition::Applied {
        block.status = BlockStatus::Finalized;
        block.finalized_at = Some(now);
    }
    Ok(transition)
}

/// `Challenged -> Invalidated` on a challenger verdict, or `Proposed | Challenged -> Invalidated`
/// by cascade.
pub(crate) fn invalidate(block: &mut Block, cause: Invalidation) -> CoordinatorResult<Transition> {
    match (block.status, cause) {
        (BlockStatus::Invalidated, _) => return Ok(Transition::Unchanged),
        (BlockStatus::Finalized, _) => {
            return Err(CoordinatorError::InvalidTransition(
                block.hash(),
                "invalidate",
                BlockStatus::Finalized,
            ))
        }
        (BlockStatus::Challenged, Invalidation::Verdict(Verdict::ChallengerWins))
        | (BlockStatus::Proposed | BlockStatus::Challenged, Invalidation::Ancestor) => {}
        (BlockStatus::Challenged, Invalidation::Verdict(_)) => {
            let game = block.game.unwrap_or_default();
            return Err(CoordinatorError::ChallengePending(block.hash(), game));
        }
        (status, Invalidation::Verdict(_)) => {
            return Err(CoordinatorError::InvalidTransition(block.hash(), "invalidate", status))
        }
    }

    block.status = BlockStatus::Invalidated;
    Ok(Transition::Applied)
}
