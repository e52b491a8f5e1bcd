//! This module contains the [BlockProposal] and [Block] types, along with the [BlockStatus]
//! lifecycle of a proposed block.

use crate::{GameId, OutputIndex};
use alloy_primitives::{keccak256, Address, B256};
use core::fmt::{Display, Formatter};

/// Computes the content hash of a block.
///
/// **Layout**:
/// | Bytes      | Field             |
/// |------------|-------------------|
/// | [0, 32)    | Parent hash       |
/// | [32, 64)   | State root        |
/// | [64, 96)   | Transactions root |
/// | [96, 104)  | Number (BE)       |
pub fn compute_block_hash(parent_hash: B256, state_root: B256, tx_root: B256, number: u64) -> B256 {
    let mut raw = [0u8; 104];
    raw[..32].copy_from_slice(parent_hash.as_slice());
    raw[32..64].copy_from_slice(state_root.as_slice());
    raw[64..96].copy_from_slice(tx_root.as_slice());
    raw[96..].copy_from_slice(&number.to_be_bytes());
    keccak256(raw)
}

/// A block proposal, as delivered by the sequencing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockProposal {
    /// The content hash of the block.
    pub hash: B256,
    /// The state root after executing every transaction in the block.
    pub state_root: B256,
    /// The hash of the parent block.
    pub parent_hash: B256,
    /// The block number.
    pub number: u64,
    /// The number of transactions in the block.
    pub tx_count: u64,
    /// The commitment to the ordered transaction list.
    pub tx_root: B256,
    /// The proposer of the block.
    pub proposer: Address,
    /// The L2 timestamp of the block.
    pub timestamp: u64,
}

impl BlockProposal {
    /// Creates a new [BlockProposal], deriving its content hash from the given fields.
    pub fn new(
        parent_hash: B256,
        state_root: B256,
        tx_root: B256,
        number: u64,
        tx_count: u64,
        proposer: Address,
        timestamp: u64,
    ) -> Self {
        Self {
            hash: compute_block_hash(parent_hash, state_root, tx_root, number),
            state_root,
            parent_hash,
            number,
            tx_count,
            tx_root,
            proposer,
            timestamp,
        }
    }

    /// Recomputes the content hash from the proposal's fields.
    pub fn compute_hash(&self) -> B256 {
        compute_block_hash(self.parent_hash, self.state_root, self.tx_root, self.number)
    }

    /// Returns `true` if the declared hash matches the content of the proposal.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

/// The lifecycle status of a proposed block.
///
/// A block that was never proposed has no status at all; the absence of a record is the
/// `NonExistent` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockStatus {
    /// The block is inside its challenge window, or waiting on its parent to finalize.
    Proposed,
    /// A dispute game over the block is open.
    Challenged,
    /// The block is final. Terminal.
    Finalized,
    /// The block, or one of its ancestors, was proven fraudulent. Terminal.
    Invalidated,
}

impl BlockStatus {
    /// Returns `true` if no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Invalidated)
    }
}

impl Display for BlockStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Proposed => write!(f, "proposed"),
            Self::Challenged => write!(f, "challenged"),
            Self::Finalized => write!(f, "finalized"),
            Self::Invalidated => write!(f, "invalidated"),
        }
    }
}

/// A proposed block together with its finality bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// The proposal as received from the sequencer.
    pub proposal: BlockProposal,
    /// The current lifecycle status.
    pub status: BlockStatus,
    /// The settlement timestamp at which the proposal was accepted.
    pub proposed_at: u64,
    /// The end of the challenge window. Challenges must arrive strictly before it.
    pub deadline: u64,
    /// The settlement timestamp at which the block was finalized. Set once.
    pub finalized_at: Option<u64>,
    /// The dispute game opened against this block, if any.
    pub game: Option<GameId>,
    /// The index of the block's output record in the ledger.
    pub output_index: OutputIndex,
    /// The bond the proposer posted with the block.
    pub bond: u64,
}

impl Block {
    /// Creates a freshly proposed [Block].
    pub const fn new(
        proposal: BlockProposal,
        proposed_at: u64,
        challenge_period: u64,
        output_index: OutputIndex,
        bond: u64,
    ) -> Self {
        Self {
            proposal,
            status: BlockStatus::Proposed,
            proposed_at,
            deadline: proposed_at.saturating_add(challenge_period),
            finalized_at: None,
            game: None,
            output_index,
            bond,
        }
    }

    /// Returns the content hash of the block.
    pub const fn hash(&self) -> B256 {
        self.proposal.hash
    }

    /// Returns the block number.
    pub const fn number(&self) -> u64 {
        self.proposal.number
    }

    /// Returns the hash of the parent block.
    pub const fn parent_hash(&self) -> B256 {
        self.proposal.parent_hash
    }

    /// Returns the claimed post-state root of the block.
    pub const fn state_root(&self) -> B256 {
        self.proposal.state_root
    }

    /// Returns `true` unless the block has been invalidated.
    pub const fn is_live(&self) -> bool {
        !matches!(self.status, BlockStatus::Invalidated)
    }

    /// Returns `true` if the challenge window has elapsed at `now`.
    pub const fn window_elapsed(&self, now: u64) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn test_block_hash_commits_to_every_field() {
        let parent = b256!("0000000000000000000000000000000000000000000000000000000000000001");
        let state = b256!("0000000000000000000000000000000000000000000000000000000000000002");
        let txs = b256!("0000000000000000000000000000000000000000000000000000000000000003");

        let base = compute_block_hash(parent, state, txs, 7);
        assert_ne!(base, compute_block_hash(state, parent, txs, 7));
        assert_ne!(base, compute_block_hash(parent, txs, state, 7));
        assert_ne!(base, compute_block_hash(parent, state, txs, 8));
        assert_eq!(base, compute_block_hash(parent, state, txs, 7));
    }

    #[test]
    fn test_proposal_hash_validation() {
        let mut proposal = BlockProposal::new(
            B256::with_last_byte(1),
            B256::with_last_byte(2),
            B256::with_last_byte(3),
            1,
            10,
            address!("00000000000000000000000000000000000000aa"),
            1_000,
        );
        assert!(proposal.has_valid_hash());

        proposal.state_root = B256::with_last_byte(4);
        assert!(!proposal.has_valid_hash());
    }

    #[test]
    fn test_block_window() {
        let proposal = BlockProposal::new(
            B256::ZERO,
            B256::with_last_byte(1),
            B256::ZERO,
            1,
            0,
            Address::ZERO,
            0,
        );
        let block = Block::new(proposal, 100, 50, OutputIndex(0), 10);
        assert_eq!(block.deadline, 150);
        assert_eq!(block.bond, 10);
        assert!(!block.window_elapsed(149));
        assert!(block.window_elapsed(150));
        assert!(block.is_live());
        assert!(!block.status.is_terminal());
    }
}
