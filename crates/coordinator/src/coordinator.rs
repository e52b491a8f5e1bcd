//! Contains the [Coordinator], which owns the lifecycle of every proposed block.

use crate::{
    lifecycle::{self, Invalidation, Transition},
    records::Records,
    CascadeCursor, CoordinatorError, CoordinatorResult, TickReport,
};
use alloy_primitives::{Address, Bytes, B256};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};
use verdict_dispute::{settle, DisputeGame, GameParams, Stakes};
use verdict_ledger::{FinalityView, OutputLedger};
use verdict_primitives::{
    Block, BlockProposal, BlockStatus, ClaimId, GameId, Half, OutputRecord, ProtocolConfig,
    ProtocolEvent, Resolution, Verdict,
};
use verdict_proof::{FraudProofClaim, FraudProofVerifier, OneStepProof, ReexecutionOracle};
use verdict_store::{SharedKeyValueStore, StagedKeyValueStore, StoreError};

/// The capacity of the event channel. Subscribers that fall further behind miss events.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The finalization coordinator.
///
/// The coordinator is the single writer of block lifecycle transitions, dispute games and
/// stake balances. Every mutating call takes `&mut self`, which serializes transitions. A call
/// either persists its transition and returns the new state, or fails without changing anything.
///
/// Writes are staged in memory and reach the backing store in one batch per transition, so a
/// crash never leaves half of a transition behind. Long transitions such as a forfeit that starts
/// a cascade are split into several consistent batches. Events are published only once the batch
/// that carries their transition has been written.
pub struct Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    pub(crate) config: ProtocolConfig,
    pub(crate) staging: Arc<spin::RwLock<StagedKeyValueStore>>,
    pub(crate) records: Records,
    pub(crate) ledger: OutputLedger,
    pub(crate) verifier: FraudProofVerifier<O>,
    pub(crate) events: broadcast::Sender<ProtocolEvent>,
    pub(crate) pending_events: Vec<ProtocolEvent>,
}

impl<O> core::fmt::Debug for Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl<O> Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Opens a coordinator over `store`.
    ///
    /// A fresh store is initialized with `config`. A store that already holds protocol state keeps
    /// its persisted configuration, which may have been changed through the administrative
    /// surface, and any interrupted invalidation cascade is completed before returning.
    pub fn open(
        config: ProtocolConfig,
        store: SharedKeyValueStore,
        oracle: O,
    ) -> CoordinatorResult<Self> {
        config.validate()?;

        let staging = Arc::new(spin::RwLock::new(StagedKeyValueStore::new(store)));
        let store: SharedKeyValueStore = staging.clone();
        let records = Records::new(store.clone());
        let config = match records.config()? {
            Some(persisted) => {
                info!(target: "coordinator", "Resuming from persisted state");
                persisted
            }
            None => {
                records.put_config(&config)?;
                info!(
                    target: "coordinator",
                    "Initialized protocol state at genesis {}",
                    config.genesis.hash
                );
                config
            }
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut coordinator = Self {
            ledger: OutputLedger::new(store, config.proposer),
            config,
            staging,
            records,
            verifier: FraudProofVerifier::new(oracle),
            events,
            pending_events: Vec::new(),
        };
        let resumed = coordinator.drain_cascade().map(|_| ());
        coordinator.finish(resumed)?;
        Ok(coordinator)
    }

    /// Writes the staged writes of a transition to the backing store in one batch and publishes
    /// the events the transition emitted.
    pub(crate) fn commit(&mut self) -> CoordinatorResult<()> {
        let written = self
            .staging
            .write()
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if written > 0 {
            trace!(target: "coordinator", "Committed a transition of {} writes", written);
        }
        for event in self.pending_events.drain(..) {
            // Sending only fails when nobody is subscribed.
            let _ = self.events.send(event);
        }
        Ok(())
    }

    /// Drops every staged write and unpublished event of a failed transition.
    pub(crate) fn rollback(&mut self) {
        self.staging.write().discard();
        self.pending_events.clear();
    }

    /// Commits the staged transition if `result` is a success and rolls it back otherwise.
    pub(crate) fn finish<T>(&mut self, result: CoordinatorResult<T>) -> CoordinatorResult<T> {
        let result = result.and_then(|value| self.commit().map(|_| value));
        if result.is_err() {
            self.rollback();
        }
        result
    }

    /// Accepts a block proposal from the registered proposer and opens its challenge window.
    ///
    /// Re-proposing a live block with identical content is a no-op. The configured proposer bond
    /// is posted with the proposal and held until the block's fate is known.
    pub fn propose(
        &mut self,
        caller: Address,
        proposal: BlockProposal,
        now: u64,
    ) -> CoordinatorResult<B256> {
        let result = self.stage_proposal(caller, proposal, now);
        self.finish(result)
    }

    fn stage_proposal(
        &mut self,
        caller: Address,
        proposal: BlockProposal,
        now: u64,
    ) -> CoordinatorResult<B256> {
        self.ensure_running()?;
        if caller != self.config.proposer || proposal.proposer != caller {
            return Err(CoordinatorError::Unauthorized(caller, "propose"));
        }
        if !proposal.has_valid_hash() {
            return Err(CoordinatorError::InvalidBlockHash(proposal.hash));
        }
        if proposal.state_root.is_zero() {
            return Err(CoordinatorError::InvalidRoot);
        }
        if proposal.number == 0 {
            return Err(CoordinatorError::InvalidNumber);
        }
        if let Some(existing) = self.records.block(proposal.hash)? {
            if existing.is_live() && existing.proposal == proposal {
                return Ok(proposal.hash);
            }
            return Err(CoordinatorError::DuplicateBlockHash(proposal.hash));
        }
        if let Some(cursor) = self.records.cursor()? {
            return Err(CoordinatorError::CascadeInProgress(cursor.origin));
        }
        if self.records.hash_at(proposal.number)?.is_some() {
            return Err(CoordinatorError::DuplicateBlockNumber(proposal.number));
        }

        let parent_state_root = self.check_parent(&proposal)?;
        if proposal.tx_count == 0 && proposal.state_root != parent_state_root {
            return Err(CoordinatorError::EmptyBlockStateChange);
        }

        let output_index = self.ledger.submit(
            caller,
            proposal.state_root,
            proposal.hash,
            proposal.number,
            proposal.tx_root,
            now,
        )?;
        let block = Block::new(
            proposal,
            now,
            self.config.challenge_period,
            output_index,
            self.config.proposer_bond,
        );
        self.records.put_block(&block)?;
        self.records.set_hash_at(block.number(), Some(block.hash()))?;
        self.records.set_head(block.number())?;

        info!(
            target: "coordinator",
            "Proposed block #{} ({}) with bond {}, challenge window open until {}",
            block.number(),
            block.hash(),
            block.bond,
            block.deadline
        );
        self.emit(ProtocolEvent::BlockProposed {
            hash: block.hash(),
            number: block.number(),
            deadline: block.deadline,
        });
        Ok(block.hash())
    }

    /// Validates the parent linkage of a proposal and returns the parent's state root.
    fn check_parent(&self, proposal: &BlockProposal) -> CoordinatorResult<B256> {
        let genesis = &self.config.genesis;
        if proposal.number == 1 {
            if proposal.parent_hash != genesis.hash {
                return Err(CoordinatorError::UnknownParent(proposal.parent_hash));
            }
            return Ok(genesis.state_root);
        }

        let parent = self
            .records
            .block(proposal.parent_hash)?
            .ok_or(CoordinatorError::UnknownParent(proposal.parent_hash))?;
        if parent.number() + 1 != proposal.number {
            return Err(CoordinatorError::ParentMismatch {
                parent: parent.hash(),
                parent_number: parent.number(),
                number: proposal.number,
            });
        }
        if !parent.is_live() {
            return Err(CoordinatorError::ParentInvalidated(parent.hash()));
        }
        if self.config.strict_parent_finality && parent.status != BlockStatus::Finalized {
            return Err(CoordinatorError::ParentNotFinalized(parent.hash()));
        }
        Ok(parent.state_root())
    }

    /// Returns the state root of the parent of `block`.
    pub(crate) fn parent_state_root(&self, block: &Block) -> CoordinatorResult<B256> {
        if block.number() == 1 {
            return Ok(self.config.genesis.state_root);
        }
        self.records
            .block(block.parent_hash())?
            .map(|parent| parent.state_root())
            .ok_or_else(|| {
                CoordinatorError::Invariant(format!("block {} has no parent", block.hash()))
            })
    }

    /// Returns `true` if the parent of `block` is final.
    pub(crate) fn parent_finalized(&self, block: &Block) -> CoordinatorResult<bool> {
        if block.number() == 1 {
            return Ok(true);
        }
        Ok(self
            .records
            .block(block.parent_hash())?
            .is_some_and(|parent| parent.status == BlockStatus::Finalized))
    }

    /// Opens a dispute game against a Proposed block and moves the block to Challenged.
    ///
    /// The game is played for the challenger's `stake` against the block's bond.
    pub fn challenge(
        &mut self,
        caller: Address,
        block_hash: B256,
        stake: u64,
        now: u64,
    ) -> CoordinatorResult<GameId> {
        let result = self.stage_challenge(caller, block_hash, stake, now);
        self.finish(result)
    }

    fn stage_challenge(
        &mut self,
        caller: Address,
        block_hash: B256,
        stake: u64,
        now: u64,
    ) -> CoordinatorResult<GameId> {
        self.ensure_running()?;
        let mut block = self.block_by_hash(block_hash)?;
        if caller == block.proposal.proposer {
            return Err(CoordinatorError::SelfChallenge(caller));
        }
        if stake < self.config.min_challenge_stake {
            return Err(CoordinatorError::InsufficientStake(stake, self.config.min_challenge_stake));
        }

        // Validate the transition on a copy so that a rejected challenge burns no game id.
        let mut candidate = block.clone();
        lifecycle::challenge(&mut candidate, GameId::default(), now)?;

        let params = GameParams {
            id: GameId::default(),
            block: block.hash(),
            block_number: block.number(),
            tx_count: block.proposal.tx_count,
            pre_state_root: self.parent_state_root(&block)?,
            claimed_root: block.state_root(),
            challenger: caller,
            defender: block.proposal.proposer,
            stakes: Stakes::new(stake, block.bond),
            round_timeout: self.config.round_timeout,
        };
        let id = self.records.next_game_id()?;
        let game = DisputeGame::open(GameParams { id, ..params }, now)?;
        lifecycle::challenge(&mut block, id, now)?;

        self.records.put_game(&game)?;
        self.records.set_game_open(id, true)?;
        self.records.put_block(&block)?;

        info!(
            target: "coordinator",
            "Block #{} ({}) challenged by {} in game {}",
            block.number(),
            block.hash(),
            caller,
            id
        );
        self.emit(ProtocolEvent::GameOpened {
            game: id,
            block: block.hash(),
            challenger: caller,
            tx_count: game.tx_count(),
        });
        self.emit(ProtocolEvent::BlockChallenged { hash: block.hash(), game: id });
        Ok(id)
    }

    /// Discloses the defender's root at the midpoint of a game's interval.
    pub fn respond_bisection(
        &mut self,
        caller: Address,
        game: GameId,
        mid_index: u64,
        mid_root: B256,
        proof: Bytes,
        now: u64,
    ) -> CoordinatorResult<()> {
        let result = self.stage_bisection(caller, game, mid_index, mid_root, proof, now);
        self.finish(result)
    }

    fn stage_bisection(
        &mut self,
        caller: Address,
        game: GameId,
        mid_index: u64,
        mid_root: B256,
        proof: Bytes,
        now: u64,
    ) -> CoordinatorResult<()> {
        self.ensure_running()?;
        let mut state = self.game(game)?;
        state.respond_bisection(caller, mid_index, mid_root, proof, now)?;
        self.records.put_game(&state)?;

        self.emit(ProtocolEvent::MidpointDisclosed {
            game,
            round: state.round(),
            mid_index,
            mid_root,
        });
        Ok(())
    }

    /// Selects the half of a game's interval the challenger still disputes.
    pub fn select_half(
        &mut self,
        caller: Address,
        game: GameId,
        half: Half,
        now: u64,
    ) -> CoordinatorResult<()> {
        let result = self.stage_selection(caller, game, half, now);
        self.finish(result)
    }

    fn stage_selection(
        &mut self,
        caller: Address,
        game: GameId,
        half: Half,
        now: u64,
    ) -> CoordinatorResult<()> {
        self.ensure_running()?;
        let mut state = self.game(game)?;
        state.select_half(caller, half, now)?;
        self.records.put_game(&state)?;

        let (start, end) = state.interval();
        self.emit(ProtocolEvent::HalfSelected { game, round: state.round(), half, start, end });
        Ok(())
    }

    /// Adjudicates the single disputed transaction of a converged game and applies the verdict.
    ///
    /// The defender is due to reveal the transaction, but anyone may submit the proof before the
    /// game's round deadline. Once it passes, the defender forfeits on the next tick.
    pub async fn submit_one_step_proof(
        &mut self,
        caller: Address,
        game: GameId,
        proof: OneStepProof,
        now: u64,
    ) -> CoordinatorResult<Verdict> {
        let result = self.stage_one_step_proof(caller, game, proof, now).await;
        self.finish(result)
    }

    async fn stage_one_step_proof(
        &mut self,
        caller: Address,
        game: GameId,
        proof: OneStepProof,
        now: u64,
    ) -> CoordinatorResult<Verdict> {
        self.ensure_running()?;
        let mut state = self.game(game)?;
        let target = state.one_step()?;
        state.ensure_before_deadline(now)?;

        let block = self.block_by_hash(state.block())?;
        proof.check(block.proposal.tx_root, block.proposal.tx_count, target.tx_index)?;

        let id = self.records.next_claim_id()?;
        let mut claim = FraudProofClaim::new(
            id,
            game,
            block.hash(),
            target.tx_index,
            target.pre_state_root,
            target.defender_post_root,
            proof.transaction,
            proof.witness,
            caller,
            now,
        );
        let outcome = self.verifier.adjudicate(&mut claim).await;
        self.records.put_claim(&claim)?;

        let verdict = state.resolve(outcome.verdict(), Resolution::Adjudicated, now)?;
        self.conclude(&state, now, &mut TickReport::default())?;
        Ok(verdict)
    }

    /// Persists a freshly resolved game, settles its stakes and applies its verdict to the
    /// contested block. Blocks that change state are recorded in `report`.
    pub(crate) fn conclude(
        &mut self,
        game: &DisputeGame,
        now: u64,
        report: &mut TickReport,
    ) -> CoordinatorResult<()> {
        let (verdict, resolution) = match (game.verdict().winner(), game.resolution()) {
            (Some(_), Some(resolution)) => (game.verdict(), resolution),
            _ => {
                return Err(CoordinatorError::Invariant(format!(
                    "game {} concluded without a verdict",
                    game.id()
                )))
            }
        };
        self.records.put_game(game)?;
        self.records.set_game_open(game.id(), false)?;
        self.emit(ProtocolEvent::GameResolved { game: game.id(), verdict, resolution });

        self.settle_stakes(game, resolution)?;

        let mut block = self.block_by_hash(game.block())?;
        match verdict {
            Verdict::ChallengerWins => {
                if block.status == BlockStatus::Challenged {
                    self.invalidate_block(&mut block, Invalidation::Verdict(verdict), report)?;
                } else {
                    debug!(
                        target: "coordinator",
                        "Game {} proved block {} fraudulent after it became {}",
                        game.id(),
                        block.hash(),
                        block.status
                    );
                }
            }
            Verdict::DefenderWins => {
                if block.status == BlockStatus::Challenged
                    && self.parent_finalized(&block)?
                    && self.finalize_block(&mut block, Some(verdict), now)? == Transition::Applied
                {
                    report.finalized.push(block.hash());
                }
            }
            Verdict::Undecided => {}
        }
        Ok(())
    }

    fn settle_stakes(&mut self, game: &DisputeGame, resolution: Resolution) -> CoordinatorResult<()> {
        let Some(winner) = game.verdict().winner() else {
            return Ok(());
        };
        let split = match resolution {
            Resolution::Adjudicated => self.config.proof_split,
            Resolution::Forfeit(_) => self.config.forfeit_split,
        };
        let payout = settle(game.stakes(), winner, split);
        let winner_address = game.address_of(winner);

        self.records.credit(winner_address, payout.winner_amount)?;
        self.records.credit(self.config.treasury, payout.treasury_amount)?;

        debug!(
            target: "coordinator",
            "Game {}: credited {} to {} ({}) and {} to the treasury",
            game.id(),
            payout.winner_amount,
            winner_address,
            winner,
            payout.treasury_amount
        );
        self.emit(ProtocolEvent::StakesSettled {
            game: game.id(),
            winner: winner_address,
            winner_amount: payout.winner_amount,
            treasury_amount: payout.treasury_amount,
        });
        Ok(())
    }

    /// Finalizes a block whose challenge window elapsed, or whose game the defender won.
    ///
    /// Finalizing a Finalized block is a no-op.
    pub fn finalize(&mut self, caller: Address, block_hash: B256, now: u64) -> CoordinatorResult<()> {
        let result = self.stage_finalize(caller, block_hash, now);
        self.finish(result)
    }

    fn stage_finalize(&mut self, caller: Address, block_hash: B256, now: u64) -> CoordinatorResult<()> {
        self.ensure_running()?;
        if !self.config.may_finalize(caller) {
            return Err(CoordinatorError::Unauthorized(caller, "finalize"));
        }
        let mut block = self.block_by_hash(block_hash)?;
        let verdict = self.verdict_of(&block)?;
        self.finalize_block(&mut block, verdict, now)?;
        Ok(())
    }

    pub(crate) fn finalize_block(
        &mut self,
        block: &mut Block,
        verdict: Option<Verdict>,
        now: u64,
    ) -> CoordinatorResult<Transition> {
        let parent_finalized = self.parent_finalized(block)?;
        let transition = lifecycle::finalize(block, verdict, parent_finalized, now)?;
        if transition == Transition::Unchanged {
            return Ok(transition);
        }

        self.ledger.finalize(block.output_index, BlockStatus::Finalized, now)?;
        self.records.put_block(block)?;

        info!(target: "coordinator", "Finalized block #{} ({})", block.number(), block.hash());
        self.emit(ProtocolEvent::BlockFinalized { hash: block.hash(), number: block.number() });
        self.release_bond(block)?;
        Ok(transition)
    }

    /// Returns the bond of an unchallenged block to its proposer.
    ///
    /// A challenged block's bond is part of its game's stakes and is paid out when the game
    /// settles, whatever happens to the block.
    fn release_bond(&mut self, block: &Block) -> CoordinatorResult<()> {
        if block.game.is_some() || block.bond == 0 {
            return Ok(());
        }
        let proposer = block.proposal.proposer;
        self.records.credit(proposer, block.bond)?;
        debug!(
            target: "coordinator",
            "Released bond {} of block #{} to {}",
            block.bond,
            block.number(),
            proposer
        );
        self.emit(ProtocolEvent::BondReleased { block: block.hash(), proposer, amount: block.bond });
        Ok(())
    }

    /// Invalidates a Challenged block whose game the challenger won, together with all of its
    /// descendants.
    ///
    /// Invalidating an Invalidated block is a no-op.
    pub fn invalidate(&mut self, block_hash: B256) -> CoordinatorResult<()> {
        let result = self.stage_invalidate(block_hash);
        self.finish(result)
    }

    fn stage_invalidate(&mut self, block_hash: B256) -> CoordinatorResult<()> {
        self.ensure_running()?;
        let mut block = self.block_by_hash(block_hash)?;
        let verdict = self.verdict_of(&block)?.unwrap_or_default();
        self.invalidate_block(
            &mut block,
            Invalidation::Verdict(verdict),
            &mut TickReport::default(),
        )?;
        Ok(())
    }

    /// Invalidates `block` and runs the first batch of the cascade over its descendants.
    pub(crate) fn invalidate_block(
        &mut self,
        block: &mut Block,
        cause: Invalidation,
        report: &mut TickReport,
    ) -> CoordinatorResult<Transition> {
        if lifecycle::invalidate(block, cause)? == Transition::Unchanged {
            return Ok(Transition::Unchanged);
        }

        self.retire(block, block.hash())?;
        report.invalidated.push(block.hash());
        self.ledger.rewind_finalized(block.number() - 1)?;
        self.records.set_head(block.number() - 1)?;

        let cursor = CascadeCursor::new(block);
        self.records.set_cursor(Some(&cursor))?;
        warn!(
            target: "coordinator",
            "Invalidated block #{} ({}); latest finalized is now #{}",
            block.number(),
            block.hash(),
            self.ledger.latest_finalized_number()?
        );

        self.run_cascade_batch(report)?;
        Ok(Transition::Applied)
    }

    /// Persists an Invalidated block, deletes its output record and frees its number.
    ///
    /// A descendant invalidated without a game of its own was never shown to be wrong, so its
    /// bond goes back to the proposer.
    pub(crate) fn retire(&mut self, block: &Block, origin: B256) -> CoordinatorResult<()> {
        self.records.put_block(block)?;
        self.ledger.delete(block.output_index)?;
        if self.records.hash_at(block.number())? == Some(block.hash()) {
            self.records.set_hash_at(block.number(), None)?;
        }
        self.emit(ProtocolEvent::BlockInvalidated {
            hash: block.hash(),
            number: block.number(),
            origin,
        });
        self.release_bond(block)
    }

    /// Returns the verdict of the game over `block`, if it was ever challenged.
    pub(crate) fn verdict_of(&self, block: &Block) -> CoordinatorResult<Option<Verdict>> {
        match block.game {
            Some(id) => Ok(Some(self.game(id)?.verdict())),
            None => Ok(None),
        }
    }

    /// Pays out the caller's claimable balance and returns the amount.
    pub fn withdraw(&mut self, caller: Address) -> CoordinatorResult<u64> {
        let result = self.stage_withdrawal(caller);
        self.finish(result)
    }

    fn stage_withdrawal(&mut self, caller: Address) -> CoordinatorResult<u64> {
        self.ensure_running()?;
        let amount = self.records.balance(caller)?;
        if amount == 0 {
            return Err(CoordinatorError::NothingToWithdraw(caller));
        }
        self.records.set_balance(caller, 0)?;
        info!(target: "coordinator", "Withdrew {} for {}", amount, caller);
        Ok(amount)
    }

    /// Queues an event for publication with the next commit.
    pub(crate) fn emit(&mut self, event: ProtocolEvent) {
        self.pending_events.push(event);
    }

    /// Subscribes to protocol events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProtocolEvent> {
        self.events.subscribe()
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Returns `true` if the block with the given number is final.
    pub fn is_finalized(&self, number: u64) -> CoordinatorResult<bool> {
        Ok(self.ledger.is_finalized(number)?)
    }

    /// Returns the number of the latest finalized block. Genesis is block `0`.
    pub fn latest_finalized(&self) -> CoordinatorResult<u64> {
        Ok(self.ledger.latest_finalized_number()?)
    }

    /// Returns a read-only [FinalityView] for consumers of finality.
    ///
    /// The view reads the backing store directly and so only ever observes committed transitions.
    pub fn finality_view(&self) -> FinalityView {
        FinalityView::new(self.staging.read().backing().clone())
    }

    /// Returns the block with the given hash, including invalidated blocks.
    pub fn block_by_hash(&self, hash: B256) -> CoordinatorResult<Block> {
        self.records.block(hash)?.ok_or(CoordinatorError::UnknownBlock(hash))
    }

    /// Returns the live block with the given number.
    pub fn block_by_number(&self, number: u64) -> CoordinatorResult<Block> {
        let hash =
            self.records.hash_at(number)?.ok_or(CoordinatorError::UnknownBlockNumber(number))?;
        self.block_by_hash(hash)
    }

    /// Returns the live output record of the block with the given number.
    pub fn output_by_number(&self, number: u64) -> CoordinatorResult<OutputRecord> {
        Ok(self.ledger.by_number(number)?)
    }

    /// Returns the most recently submitted live output record.
    pub fn latest_output(&self) -> CoordinatorResult<OutputRecord> {
        Ok(self.ledger.latest_submitted()?)
    }

    /// Returns the game with the given id.
    pub fn game(&self, id: GameId) -> CoordinatorResult<DisputeGame> {
        self.records.game(id)?.ok_or(CoordinatorError::UnknownGame(id))
    }

    /// Returns the claim with the given id.
    pub fn claim(&self, id: ClaimId) -> CoordinatorResult<FraudProofClaim> {
        self.records.claim(id)?.ok_or(CoordinatorError::UnknownClaim(id))
    }

    /// Returns the ids of all unresolved games, in ascending order.
    pub fn open_games(&self) -> CoordinatorResult<Vec<GameId>> {
        Ok(self.records.open_games()?.into_iter().collect())
    }

    /// Returns the claimable balance of `owner`.
    pub fn claimable(&self, owner: Address) -> CoordinatorResult<u64> {
        self.records.balance(owner)
    }

    /// Returns the number of the highest live block.
    pub fn head(&self) -> CoordinatorResult<u64> {
        self.records.head()
    }
}
