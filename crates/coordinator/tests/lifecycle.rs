//! Block lifecycle tests: proposal validation, challenge windows and finalization.

mod common;

use alloy_primitives::{Address, B256};
use common::*;
use verdict_coordinator::{CoordinatorError, ErrorKind};
use verdict_primitives::{BlockProposal, BlockStatus, ProtocolConfig, ProtocolEvent};

#[tokio::test]
async fn test_propose_and_finalize_after_window() {
    let mut harness = Harness::new();
    let mut events = harness.coordinator.subscribe();

    let proposed_at = harness.now;
    let block = harness.propose_honest(3).await;
    assert!(!harness.coordinator.is_finalized(1).unwrap());

    harness.advance(CHALLENGE_PERIOD);
    harness.coordinator.finalize(Address::repeat_byte(0x42), block, harness.now).unwrap();

    assert!(harness.coordinator.is_finalized(1).unwrap());
    assert_eq!(harness.coordinator.latest_finalized().unwrap(), 1);
    let stored = harness.coordinator.block_by_number(1).unwrap();
    assert_eq!(stored.status, BlockStatus::Finalized);
    assert_eq!(stored.finalized_at, Some(proposed_at + CHALLENGE_PERIOD));
    assert!(harness.coordinator.output_by_number(1).unwrap().finalized);

    assert_eq!(
        events.try_recv().unwrap(),
        ProtocolEvent::BlockProposed {
            hash: block,
            number: 1,
            deadline: proposed_at + CHALLENGE_PERIOD
        }
    );
    assert_eq!(events.try_recv().unwrap(), ProtocolEvent::BlockFinalized { hash: block, number: 1 });
}

#[tokio::test]
async fn test_bonds_and_stakes_are_conserved() {
    let mut harness = Harness::new();
    let mut events = harness.coordinator.subscribe();
    let first = harness.propose_honest(2).await;
    let (_, game) = harness.propose_fraud(4, 2).await;
    let descendant = harness.propose_honest(1).await;
    assert_eq!(harness.coordinator.block_by_hash(first).unwrap().bond, BOND);

    // Nothing is claimable while every outcome is open.
    for owner in [PROPOSER, CHALLENGER, TREASURY] {
        assert_eq!(harness.coordinator.claimable(owner).unwrap(), 0);
    }

    harness.play(game, usize::MAX).await;
    harness.advance(CHALLENGE_PERIOD);
    harness.coordinator.tick(harness.now).unwrap();
    assert!(harness.coordinator.is_finalized(1).unwrap());

    let deposited = 3 * BOND + STAKE;
    let claimable: u64 = [PROPOSER, CHALLENGER, TREASURY]
        .into_iter()
        .map(|owner| harness.coordinator.claimable(owner).unwrap())
        .sum();
    assert_eq!(claimable, deposited);
    assert_eq!(harness.coordinator.claimable(PROPOSER).unwrap(), 2 * BOND);

    let released: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            ProtocolEvent::BondReleased { block, proposer, amount } => {
                assert_eq!((proposer, amount), (PROPOSER, BOND));
                Some(block)
            }
            _ => None,
        })
        .collect();
    assert_eq!(released, vec![descendant, first]);
}

#[tokio::test]
async fn test_challenged_block_cannot_finalize() {
    let mut harness = Harness::with_config(ProtocolConfig {
        round_timeout: 2 * CHALLENGE_PERIOD,
        ..config()
    });
    harness.propose_honest(2).await;
    let (block, game) = harness.propose_fraud(4, 1).await;
    assert_eq!(harness.coordinator.block_by_hash(block).unwrap().status, BlockStatus::Challenged);

    harness.advance(CHALLENGE_PERIOD);
    assert_eq!(
        harness.coordinator.finalize(PROPOSER, block, harness.now),
        Err(CoordinatorError::ChallengePending(block, game))
    );

    // The game still runs, so ticking finalizes block 1 and stops at block 2.
    let report = harness.coordinator.tick(harness.now).unwrap();
    assert_eq!(report.finalized.len(), 1);
    assert!(report.forfeited.is_empty());
    assert_eq!(harness.coordinator.latest_finalized().unwrap(), 1);
}

#[tokio::test]
async fn test_challenge_window_bounds() {
    let mut harness = Harness::new();
    let (first, _) = harness.propose(2, None).await;
    let deadline = harness.coordinator.block_by_hash(first).unwrap().deadline;

    harness.now = deadline - 1;
    let err = harness.coordinator.finalize(PROPOSER, first, harness.now).unwrap_err();
    assert_eq!(err, CoordinatorError::WindowNotElapsed(first, deadline));
    assert_eq!(err.kind(), ErrorKind::Temporal);

    harness.now = deadline;
    assert_eq!(
        harness.coordinator.challenge(CHALLENGER, first, STAKE, harness.now),
        Err(CoordinatorError::WindowExpired(first, deadline))
    );

    harness.now = deadline - 1;
    harness.coordinator.challenge(CHALLENGER, first, STAKE, harness.now).unwrap();
    assert!(matches!(
        harness.coordinator.challenge(CHALLENGER, first, STAKE, harness.now),
        Err(CoordinatorError::AlreadyChallenged(..))
    ));
}

#[tokio::test]
async fn test_challenge_rejections() {
    let mut harness = Harness::new();
    let block = harness.propose_honest(2).await;

    assert_eq!(
        harness.coordinator.challenge(PROPOSER, block, STAKE, harness.now),
        Err(CoordinatorError::SelfChallenge(PROPOSER))
    );
    assert_eq!(
        harness.coordinator.challenge(CHALLENGER, block, 99, harness.now),
        Err(CoordinatorError::InsufficientStake(99, 100))
    );
    assert_eq!(
        harness.coordinator.challenge(CHALLENGER, B256::ZERO, STAKE, harness.now),
        Err(CoordinatorError::UnknownBlock(B256::ZERO))
    );
    assert!(harness.coordinator.open_games().unwrap().is_empty());
}

#[tokio::test]
async fn test_proposal_validation() {
    let mut harness = Harness::new();
    let (proposal, _, _) = harness.build(2, None).await;
    let now = harness.now;

    assert_eq!(
        harness.coordinator.propose(CHALLENGER, proposal.clone(), now),
        Err(CoordinatorError::Unauthorized(CHALLENGER, "propose"))
    );

    let mut forged = proposal.clone();
    forged.state_root = B256::repeat_byte(0x99);
    assert_eq!(
        harness.coordinator.propose(PROPOSER, forged, now),
        Err(CoordinatorError::InvalidBlockHash(proposal.hash))
    );

    let orphan = BlockProposal::new(
        B256::repeat_byte(0x77),
        proposal.state_root,
        proposal.tx_root,
        1,
        2,
        PROPOSER,
        now,
    );
    assert_eq!(
        harness.coordinator.propose(PROPOSER, orphan, now),
        Err(CoordinatorError::UnknownParent(B256::repeat_byte(0x77)))
    );

    let zero = BlockProposal::new(genesis().hash, B256::ZERO, proposal.tx_root, 1, 2, PROPOSER, now);
    assert_eq!(harness.coordinator.propose(PROPOSER, zero, now), Err(CoordinatorError::InvalidRoot));

    let hash = harness.coordinator.propose(PROPOSER, proposal.clone(), now).unwrap();
    assert_eq!(harness.coordinator.propose(PROPOSER, proposal.clone(), now + 5), Ok(hash));
    assert_eq!(harness.coordinator.block_by_hash(hash).unwrap().proposed_at, now);

    let rival = BlockProposal::new(
        genesis().hash,
        B256::repeat_byte(0x31),
        proposal.tx_root,
        1,
        2,
        PROPOSER,
        now,
    );
    assert_eq!(
        harness.coordinator.propose(PROPOSER, rival, now),
        Err(CoordinatorError::DuplicateBlockNumber(1))
    );

    let skipping =
        BlockProposal::new(hash, B256::repeat_byte(0x32), proposal.tx_root, 3, 2, PROPOSER, now);
    assert!(matches!(
        harness.coordinator.propose(PROPOSER, skipping, now),
        Err(CoordinatorError::ParentMismatch { parent_number: 1, number: 3, .. })
    ));
}

#[tokio::test]
async fn test_empty_blocks() {
    let mut harness = Harness::new();
    let now = harness.now;
    let genesis = genesis();

    let changing =
        BlockProposal::new(genesis.hash, B256::repeat_byte(0x42), B256::ZERO, 1, 0, PROPOSER, now);
    assert_eq!(
        harness.coordinator.propose(PROPOSER, changing, now),
        Err(CoordinatorError::EmptyBlockStateChange)
    );

    let empty = harness.propose_honest(0).await;
    assert_eq!(harness.coordinator.block_by_hash(empty).unwrap().state_root(), genesis.state_root);
    assert_eq!(
        harness.coordinator.challenge(CHALLENGER, empty, STAKE, harness.now),
        Err(CoordinatorError::EmptyBlock(empty))
    );
}

#[tokio::test]
async fn test_strict_parent_finality() {
    let mut harness =
        Harness::with_config(ProtocolConfig { strict_parent_finality: true, ..config() });
    let first = harness.propose_honest(1).await;

    let (second, _, _) = harness.build(1, None).await;
    assert_eq!(
        harness.coordinator.propose(PROPOSER, second, harness.now),
        Err(CoordinatorError::ParentNotFinalized(first))
    );

    harness.advance(CHALLENGE_PERIOD);
    harness.coordinator.tick(harness.now).unwrap();
    harness.propose_honest(1).await;
    assert_eq!(harness.coordinator.head().unwrap(), 2);
}

#[tokio::test]
async fn test_finality_is_monotonic() {
    let mut harness = Harness::new();
    let mut blocks = Vec::new();
    for _ in 0..3 {
        blocks.push(harness.propose_honest(2).await);
        harness.advance(10);
    }

    // Block 3 was proposed 20 seconds after block 1.
    harness.now = harness.coordinator.block_by_number(2).unwrap().deadline;
    let report = harness.coordinator.tick(harness.now).unwrap();
    assert_eq!(report.finalized, blocks[..2].to_vec());
    assert!(harness.coordinator.tick(harness.now).unwrap().is_empty());

    harness.advance(1_000);
    let report = harness.coordinator.tick(harness.now).unwrap();
    assert_eq!(report.finalized, vec![blocks[2]]);

    for number in 0..=3 {
        assert!(harness.coordinator.is_finalized(number).unwrap());
    }
    let view = harness.coordinator.finality_view();
    assert_eq!(view.latest_finalized().unwrap(), 3);

    harness.coordinator.finalize(PROPOSER, blocks[0], harness.now).unwrap();
    assert!(matches!(
        harness.coordinator.invalidate(blocks[1]),
        Err(CoordinatorError::InvalidTransition(_, "invalidate", BlockStatus::Finalized))
    ));
    assert!(harness.coordinator.is_finalized(2).unwrap());
}

#[tokio::test]
async fn test_finalizer_role() {
    let mut harness = Harness::new();
    let block = harness.propose_honest(1).await;
    let finalizer = Address::repeat_byte(0xF1);
    harness.coordinator.set_finalizer(ADMIN, Some(finalizer)).unwrap();

    harness.advance(CHALLENGE_PERIOD);
    assert_eq!(
        harness.coordinator.finalize(PROPOSER, block, harness.now),
        Err(CoordinatorError::Unauthorized(PROPOSER, "finalize"))
    );
    harness.coordinator.finalize(finalizer, block, harness.now).unwrap();
}
