//! Administrative surface tests: pausing, deadline extension and configuration changes.

mod common;

use alloy_primitives::Address;
use common::*;
use verdict_coordinator::{CoordinatorError, ErrorKind};
use verdict_primitives::{BlockStatus, ProtocolEvent};

#[tokio::test]
async fn test_pause_blocks_mutations_and_extends_deadlines() {
    let mut harness = Harness::new();
    let honest = harness.propose_honest(2).await;
    let (_, game) = harness.propose_fraud(4, 2).await;
    let block_deadline = harness.coordinator.block_by_hash(honest).unwrap().deadline;
    let game_deadline = harness.coordinator.game(game).unwrap().deadline();

    harness.advance(100);
    harness.coordinator.pause(ADMIN, harness.now).unwrap();

    let (proposal, _, _) = harness.build(1, None).await;
    let err = harness.coordinator.propose(PROPOSER, proposal, harness.now).unwrap_err();
    assert_eq!(err, CoordinatorError::Paused);
    assert_eq!(err.kind(), ErrorKind::Temporal);
    let Some(action) = harness.next_action(game) else { panic!("defender should be due") };
    assert_eq!(harness.submit(action).await, Err(CoordinatorError::Paused));
    assert_eq!(harness.coordinator.tick(harness.now), Err(CoordinatorError::Paused));
    assert_eq!(
        harness.coordinator.finalize(PROPOSER, honest, harness.now),
        Err(CoordinatorError::Paused)
    );

    // Admin calls keep working while paused.
    harness.coordinator.set_round_timeout(ADMIN, 2 * ROUND_TIMEOUT).unwrap();

    harness.advance(5 * ROUND_TIMEOUT);
    assert_eq!(harness.coordinator.unpause(ADMIN, harness.now), Ok(5 * ROUND_TIMEOUT));
    assert_eq!(
        harness.coordinator.block_by_hash(honest).unwrap().deadline,
        block_deadline + 5 * ROUND_TIMEOUT
    );
    assert_eq!(
        harness.coordinator.game(game).unwrap().deadline(),
        game_deadline + 5 * ROUND_TIMEOUT
    );

    // The defender lost no time to the pause.
    let report = harness.coordinator.tick(harness.now).unwrap();
    assert!(report.forfeited.is_empty());
    harness.play(game, usize::MAX).await;
    assert!(harness.coordinator.game(game).unwrap().is_resolved());
}

#[tokio::test]
async fn test_challenged_block_keeps_its_deadline() {
    let mut harness = Harness::new();
    let (block, _) = harness.propose_fraud(2, 0).await;
    let deadline = harness.coordinator.block_by_hash(block).unwrap().deadline;

    harness.coordinator.pause(ADMIN, harness.now).unwrap();
    harness.coordinator.unpause(ADMIN, harness.now + 50).unwrap();

    let stored = harness.coordinator.block_by_hash(block).unwrap();
    assert_eq!(stored.status, BlockStatus::Challenged);
    assert_eq!(stored.deadline, deadline);
}

#[tokio::test]
async fn test_config_changes() {
    let mut harness = Harness::new();
    let mut events = harness.coordinator.subscribe();
    let stranger = Address::repeat_byte(0x99);

    assert_eq!(
        harness.coordinator.set_challenge_period(stranger, 2 * CHALLENGE_PERIOD),
        Err(CoordinatorError::Unauthorized(stranger, "set_challenge_period"))
    );
    assert!(matches!(
        harness.coordinator.set_challenge_period(ADMIN, 60),
        Err(CoordinatorError::Config(_))
    ));

    harness.coordinator.set_challenge_period(ADMIN, 2 * CHALLENGE_PERIOD).unwrap();
    let block = harness.propose_honest(1).await;
    assert_eq!(
        harness.coordinator.block_by_hash(block).unwrap().deadline,
        harness.now + 2 * CHALLENGE_PERIOD
    );
    assert_eq!(
        events.try_recv().unwrap(),
        ProtocolEvent::ConfigUpdated { parameter: "challenge_period".to_string() }
    );

    // Rotating the proposer locks out the old one.
    let successor = Address::repeat_byte(0xB1);
    harness.coordinator.set_proposer(ADMIN, successor).unwrap();
    let (proposal, _, _) = harness.build(1, None).await;
    assert_eq!(
        harness.coordinator.propose(PROPOSER, proposal, harness.now),
        Err(CoordinatorError::Unauthorized(PROPOSER, "propose"))
    );

    // The persisted configuration survives a restart.
    harness.reopen().unwrap();
    assert_eq!(harness.coordinator.config().proposer, successor);
    assert_eq!(harness.coordinator.config().challenge_period, 2 * CHALLENGE_PERIOD);
}
