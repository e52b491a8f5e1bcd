//! Contains the [FraudProofVerifier].

use crate::{ChallengerWinReason, ClaimOutcome, FraudProofClaim, ReexecutionOracle};
use alloc::string::ToString;
use tracing::{info, warn};

/// Adjudicates [FraudProofClaim]s by re-executing the disputed transaction.
#[derive(Debug, Clone)]
pub struct FraudProofVerifier<O>
where
    O: ReexecutionOracle,
{
    oracle: O,
}

impl<O> FraudProofVerifier<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Creates a new [FraudProofVerifier] backed by the given oracle.
    pub const fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Returns the oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Adjudicates the claim and returns its outcome.
    ///
    /// A claim that already carries an outcome is returned as-is without re-executing anything.
    pub async fn adjudicate(&self, claim: &mut FraudProofClaim) -> ClaimOutcome {
        if claim.outcome().is_adjudicated() {
            return claim.outcome().clone();
        }

        let (computed, outcome) = match self
            .oracle
            .execute(claim.pre_state_root, &claim.transaction, &claim.witness)
            .await
        {
            Ok(root) if root == claim.defender_post_root => (Some(root), ClaimOutcome::DefenderWins),
            Ok(root) => {
                warn!(
                    target: "fraud-proof",
                    "Claim {}: transaction {} of block {} produces {}, defender claimed {}",
                    claim.id, claim.tx_index, claim.block, root, claim.defender_post_root
                );
                (Some(root), ClaimOutcome::ChallengerWins(ChallengerWinReason::RootMismatch))
            }
            Err(e) => {
                warn!(
                    target: "fraud-proof",
                    "Claim {}: re-execution of transaction {} failed: {}",
                    claim.id, claim.tx_index, e
                );
                (
                    None,
                    ClaimOutcome::ChallengerWins(ChallengerWinReason::ExecutionFailed(
                        e.to_string(),
                    )),
                )
            }
        };

        info!(target: "fraud-proof", "Claim {} for game {} adjudicated: {}", claim.id, claim.game, outcome);
        claim.record(computed, outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::MockReexecutionOracle;
    use alloy_primitives::{Address, Bytes, B256};
    use verdict_primitives::{ClaimId, GameId};

    fn claim(transaction: &'static [u8], defender_post_root: B256) -> FraudProofClaim {
        FraudProofClaim::new(
            ClaimId(0),
            GameId(0),
            B256::repeat_byte(0xBB),
            3,
            B256::with_last_byte(1),
            defender_post_root,
            Bytes::from_static(transaction),
            Bytes::new(),
            Address::ZERO,
            0,
        )
    }

    #[tokio::test]
    async fn test_matching_root_upholds_block() {
        let oracle = MockReexecutionOracle::default();
        let honest = oracle.transition(B256::with_last_byte(1), b"transfer");
        let verifier = FraudProofVerifier::new(oracle);

        let mut claim = claim(b"transfer", honest);
        assert_eq!(verifier.adjudicate(&mut claim).await, ClaimOutcome::DefenderWins);
        assert_eq!(claim.computed_post_root(), Some(honest));
    }

    #[tokio::test]
    async fn test_mismatch_convicts_defender() {
        let verifier = FraudProofVerifier::new(MockReexecutionOracle::default());
        let mut claim = claim(b"transfer", B256::repeat_byte(0xEE));
        assert_eq!(
            verifier.adjudicate(&mut claim).await,
            ClaimOutcome::ChallengerWins(ChallengerWinReason::RootMismatch)
        );
    }

    #[tokio::test]
    async fn test_execution_failure_convicts_defender() {
        let oracle = MockReexecutionOracle::default().failing_on(b"poison");
        let verifier = FraudProofVerifier::new(oracle);
        let mut claim = claim(b"poison", B256::repeat_byte(0xEE));

        let outcome = verifier.adjudicate(&mut claim).await;
        assert!(matches!(
            outcome,
            ClaimOutcome::ChallengerWins(ChallengerWinReason::ExecutionFailed(_))
        ));
        assert_eq!(claim.computed_post_root(), None);
    }

    #[tokio::test]
    async fn test_adjudicates_once() {
        let oracle = MockReexecutionOracle::default();
        let honest = oracle.transition(B256::with_last_byte(1), b"transfer");
        let verifier = FraudProofVerifier::new(oracle);

        let mut claim = claim(b"transfer", honest);
        verifier.adjudicate(&mut claim).await;
        verifier.adjudicate(&mut claim).await;
        assert_eq!(verifier.oracle().executions(), 1);
        assert_eq!(claim.outcome(), &ClaimOutcome::DefenderWins);
    }
}
