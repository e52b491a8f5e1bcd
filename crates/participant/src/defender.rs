//! The [Defender] client, run by the proposer.

use crate::{Action, ExecutionTrace, ParticipantError, ParticipantResult, TracedBlock};
use alloy_primitives::{Address, Bytes, B256};
use std::collections::HashMap;
use tracing::debug;
use verdict_dispute::{DisputeGame, GamePhase};
use verdict_primitives::Party;

/// Defends the proposer's blocks in bisection games.
///
/// The defender answers with whatever its registered trace says, which lets tests model both an
/// honest proposer and one that misreported execution. Once a game converges it reveals the
/// disputed transaction, since a defender that withholds it forfeits.
#[derive(Debug, Clone)]
pub struct Defender {
    address: Address,
    blocks: HashMap<B256, TracedBlock>,
}

impl Defender {
    /// Creates a defender acting as `address`.
    pub fn new(address: Address) -> Self {
        Self { address, blocks: HashMap::new() }
    }

    /// Returns the identity the defender acts as.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Registers the transactions of `block` and the trace backing its proposal.
    pub fn register(&mut self, block: B256, transactions: Vec<Bytes>, trace: ExecutionTrace) {
        self.blocks.insert(block, TracedBlock { transactions, trace });
    }

    /// Returns the next action in `game`, if the defender is due.
    pub fn act(&self, game: &DisputeGame) -> ParticipantResult<Option<Action>> {
        if game.defender() != self.address || game.due() != Some(Party::Defender) {
            return Ok(None);
        }
        let block = self
            .blocks
            .get(&game.block())
            .ok_or(ParticipantError::UnknownBlock(game.id(), game.block()))?;
        let trace = &block.trace;
        if trace.len() != game.tx_count() {
            return Err(ParticipantError::TraceLength { expected: game.tx_count(), got: trace.len() });
        }

        if game.phase() == GamePhase::AwaitingProof {
            let (tx_index, _) = game.interval();
            debug!(
                target: "participant",
                "Defender reveals transaction {} in game {}",
                tx_index,
                game.id()
            );
            let proof = block.one_step_proof(tx_index)?;
            return Ok(Some(Action::SubmitOneStepProof { game: game.id(), proof }));
        }

        let mid_index = game.midpoint();
        let mid_root = trace.root_at(mid_index).ok_or(ParticipantError::TraceLength {
            expected: game.tx_count(),
            got: trace.len(),
        })?;
        debug!(
            target: "participant",
            "Defender discloses {} at index {} in game {}",
            mid_root,
            mid_index,
            game.id()
        );
        Ok(Some(Action::RespondBisection {
            game: game.id(),
            mid_index,
            mid_root,
            proof: Bytes::new(),
        }))
    }
}
