//! The [Challenger] client, run by a watcher of proposals.

use crate::{Action, ExecutionTrace, ParticipantError, ParticipantResult, TracedBlock};
use alloy_primitives::{Address, Bytes, B256};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use verdict_dispute::{DisputeGame, GamePhase, Half};
use verdict_primitives::BlockProposal;
use verdict_proof::{transactions_root, ReexecutionOracle};

/// Watches proposals, challenges fraudulent ones and plays the resulting games.
#[derive(Debug)]
pub struct Challenger<O> {
    address: Address,
    stake: u64,
    oracle: O,
    blocks: HashMap<B256, TracedBlock>,
}

impl<O> Challenger<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Creates a challenger acting as `address` that posts `stake` per challenge.
    pub fn new(address: Address, stake: u64, oracle: O) -> Self {
        Self { address, stake, oracle, blocks: HashMap::new() }
    }

    /// Returns the identity the challenger acts as.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the challenger's own trace of a watched block.
    pub fn trace(&self, block: B256) -> Option<&ExecutionTrace> {
        self.blocks.get(&block).map(|watched| &watched.trace)
    }

    /// Replays `proposal` on top of `pre_state_root` and returns a challenge if the proposal's
    /// state root does not match the replayed one.
    pub async fn assess(
        &mut self,
        proposal: &BlockProposal,
        pre_state_root: B256,
        transactions: Vec<Bytes>,
    ) -> ParticipantResult<Option<Action>> {
        if transactions.len() as u64 != proposal.tx_count {
            return Err(ParticipantError::TraceLength {
                expected: proposal.tx_count,
                got: transactions.len() as u64,
            });
        }
        let computed = transactions_root(&transactions);
        if computed != proposal.tx_root {
            return Err(ParticipantError::TransactionsMismatch {
                block: proposal.hash,
                expected: proposal.tx_root,
                computed,
            });
        }

        let trace = ExecutionTrace::replay(&self.oracle, pre_state_root, &transactions).await?;
        let honest_root = trace.post_state_root();
        self.blocks.insert(proposal.hash, TracedBlock { transactions, trace });

        if honest_root == proposal.state_root || proposal.tx_count == 0 {
            debug!(target: "participant", "Block #{} ({}) replays correctly", proposal.number, proposal.hash);
            return Ok(None);
        }

        info!(
            target: "participant",
            "Block #{} ({}) claims {}, replay gives {}; challenging",
            proposal.number,
            proposal.hash,
            proposal.state_root,
            honest_root
        );
        Ok(Some(Action::Challenge { block: proposal.hash, stake: self.stake }))
    }

    /// Returns the next action in `game`.
    ///
    /// The challenger acts when it is due, and also submits the one-step proof itself once the
    /// game converges rather than waiting for the defender to reveal the transaction.
    pub fn act(&self, game: &DisputeGame) -> ParticipantResult<Option<Action>> {
        if game.challenger() != self.address {
            return Ok(None);
        }
        let watched = self
            .blocks
            .get(&game.block())
            .ok_or(ParticipantError::UnknownBlock(game.id(), game.block()))?;

        match game.phase() {
            GamePhase::AwaitingSelection => {
                let Some((mid_index, mid_root)) = game.disclosed() else {
                    return Ok(None);
                };
                // Agreement at the midpoint moves the dispute into the upper half.
                let half = if watched.trace.root_at(mid_index) == Some(mid_root) {
                    Half::Upper
                } else {
                    Half::Lower
                };
                debug!(
                    target: "participant",
                    "Challenger selects {} half at index {} in game {}",
                    half,
                    mid_index,
                    game.id()
                );
                Ok(Some(Action::SelectHalf { game: game.id(), half }))
            }
            GamePhase::AwaitingProof => {
                let (tx_index, _) = game.interval();
                if watched.trace.root_at(tx_index + 1) == Some(game.defender_root()) {
                    warn!(
                        target: "participant",
                        "Game {} converged on transaction {} that replays as claimed",
                        game.id(),
                        tx_index
                    );
                }
                let proof = watched.one_step_proof(tx_index)?;
                Ok(Some(Action::SubmitOneStepProof { game: game.id(), proof }))
            }
            GamePhase::AwaitingMidpoint | GamePhase::Resolved => Ok(None),
        }
    }
}
