//! Contains the [ProtocolEvent] type emitted by the coordinator.

use crate::{GameId, Half, Resolution, Verdict};
use alloc::string::String;
use alloy_primitives::{Address, B256};

/// An observable protocol transition.
///
/// Events are emitted after the transition has been persisted. Off-chain participants react to
/// them; bridges watch for [ProtocolEvent::BlockFinalized] and [ProtocolEvent::BlockInvalidated].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolEvent {
    /// A block was accepted and its challenge window opened.
    BlockProposed {
        /// The block hash.
        hash: B256,
        /// The block number.
        number: u64,
        /// The end of the challenge window.
        deadline: u64,
    },
    /// A block was challenged.
    BlockChallenged {
        /// The block hash.
        hash: B256,
        /// The game opened against it.
        game: GameId,
    },
    /// A block became final.
    BlockFinalized {
        /// The block hash.
        hash: B256,
        /// The block number.
        number: u64,
    },
    /// A block was invalidated, either directly or by cascade from `origin`.
    BlockInvalidated {
        /// The block hash.
        hash: B256,
        /// The block number.
        number: u64,
        /// The hash of the block whose fraud caused this invalidation.
        origin: B256,
    },
    /// A dispute game was opened.
    GameOpened {
        /// The game.
        game: GameId,
        /// The contested block.
        block: B256,
        /// The challenger.
        challenger: Address,
        /// The number of transactions under dispute.
        tx_count: u64,
    },
    /// The defender disclosed a midpoint root.
    MidpointDisclosed {
        /// The game.
        game: GameId,
        /// The round in which the disclosure happened.
        round: u64,
        /// The disclosed transaction index.
        mid_index: u64,
        /// The root after transaction `mid_index - 1`.
        mid_root: B256,
    },
    /// The challenger selected the disputed half.
    HalfSelected {
        /// The game.
        game: GameId,
        /// The round completed by this selection.
        round: u64,
        /// The selected half.
        half: Half,
        /// The new interval start.
        start: u64,
        /// The new interval end.
        end: u64,
    },
    /// A dispute game reached its verdict.
    GameResolved {
        /// The game.
        game: GameId,
        /// The verdict.
        verdict: Verdict,
        /// How the verdict was reached.
        resolution: Resolution,
    },
    /// The stakes of a resolved game were credited.
    StakesSettled {
        /// The game.
        game: GameId,
        /// The winner's address.
        winner: Address,
        /// The amount credited to the winner.
        winner_amount: u64,
        /// The amount credited to the treasury.
        treasury_amount: u64,
    },
    /// The bond of a block that was never challenged went back to its proposer.
    BondReleased {
        /// The block hash.
        block: B256,
        /// The proposer credited with the bond.
        proposer: Address,
        /// The bond.
        amount: u64,
    },
    /// Mutating operations were paused.
    Paused {
        /// The settlement timestamp of the pause.
        at: u64,
    },
    /// Mutating operations were resumed.
    Unpaused {
        /// The settlement timestamp of the resumption.
        at: u64,
        /// The number of seconds every open deadline was extended by.
        extended_by: u64,
    },
    /// The administrative surface updated the protocol configuration.
    ConfigUpdated {
        /// The name of the updated parameter.
        parameter: String,
    },
}
