//! Contains the [DisputeGame] state machine.

use crate::{DisputeError, DisputeResult, Stakes};
use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, B256};
use tracing::{debug, info, warn};
use verdict_primitives::{GameId, Half, Party, Resolution, Verdict};

/// Returns the maximum number of bisection rounds for a block of `tx_count` transactions,
/// `ceil(log2(tx_count))`.
pub const fn max_rounds(tx_count: u64) -> u64 {
    if tx_count <= 1 {
        0
    } else {
        (u64::BITS - (tx_count - 1).leading_zeros()) as u64
    }
}

/// The phase of a [DisputeGame]. Each unresolved phase has exactly one due party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    /// The defender must disclose the root at the midpoint.
    #[display("awaiting midpoint")]
    AwaitingMidpoint,
    /// The challenger must select the disputed half.
    #[display("awaiting selection")]
    AwaitingSelection,
    /// The interval has width one. The defender must reveal the disputed transaction and its
    /// inclusion in the block by submitting the one-step proof.
    #[display("awaiting proof")]
    AwaitingProof,
    /// The game has a verdict.
    #[display("resolved")]
    Resolved,
}

impl GamePhase {
    /// Returns the party that must act in this phase.
    pub const fn due(&self) -> Option<Party> {
        match self {
            Self::AwaitingMidpoint | Self::AwaitingProof => Some(Party::Defender),
            Self::AwaitingSelection => Some(Party::Challenger),
            Self::Resolved => None,
        }
    }
}

/// A single midpoint disclosure, kept for auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord {
    /// The round of the disclosure.
    pub round: u64,
    /// The disclosed transaction index.
    pub mid_index: u64,
    /// The root after transaction `mid_index - 1`.
    pub mid_root: B256,
    /// The auxiliary proof supplied with the disclosure.
    pub proof: Bytes,
    /// The settlement timestamp of the disclosure.
    pub disclosed_at: u64,
    /// The half the challenger selected in response, once it has.
    pub selected: Option<Half>,
}

/// The single transaction left in dispute once bisection has converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneStepTarget {
    /// The index of the disputed transaction.
    pub tx_index: u64,
    /// The last agreed root, before the disputed transaction.
    pub pre_state_root: B256,
    /// The defender's claimed root after the disputed transaction.
    pub defender_post_root: B256,
}

/// The parameters a [DisputeGame] is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    /// The game id.
    pub id: GameId,
    /// The hash of the contested block.
    pub block: B256,
    /// The number of the contested block.
    pub block_number: u64,
    /// The number of transactions in the contested block.
    pub tx_count: u64,
    /// The state root of the parent block, agreed by both parties.
    pub pre_state_root: B256,
    /// The state root the block claims.
    pub claimed_root: B256,
    /// The challenger.
    pub challenger: Address,
    /// The defender, the proposer of the block.
    pub defender: Address,
    /// The escrowed stakes.
    pub stakes: Stakes,
    /// The time each party has to act.
    pub round_timeout: u64,
}

/// A two-party bisection game over the transactions of one block.
///
/// The game tracks the interval `[start, end)` under dispute, the root both parties agree on at
/// `start`, and the root the defender claims at `end`. Selecting the lower half moves the
/// defender's claim to the midpoint; selecting the upper half makes the midpoint the new agreed
/// root. Every action restarts the round clock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisputeGame {
    id: GameId,
    block: B256,
    block_number: u64,
    tx_count: u64,
    challenger: Address,
    defender: Address,
    start: u64,
    end: u64,
    agreed_root: B256,
    defender_root: B256,
    disclosed: Option<(u64, B256)>,
    round: u64,
    round_timeout: u64,
    deadline: u64,
    phase: GamePhase,
    verdict: Verdict,
    resolution: Option<Resolution>,
    stakes: Stakes,
    opened_at: u64,
    resolved_at: Option<u64>,
    rounds: Vec<RoundRecord>,
}

impl DisputeGame {
    /// Opens a new game at `now`.
    pub fn open(params: GameParams, now: u64) -> DisputeResult<Self> {
        if params.tx_count == 0 {
            return Err(DisputeError::EmptyBlock);
        }

        let phase = if params.tx_count == 1 {
            GamePhase::AwaitingProof
        } else {
            GamePhase::AwaitingMidpoint
        };
        info!(
            target: "dispute-game",
            "Opened game {} over block #{} ({} transactions, at most {} rounds)",
            params.id,
            params.block_number,
            params.tx_count,
            max_rounds(params.tx_count)
        );

        Ok(Self {
            id: params.id,
            block: params.block,
            block_number: params.block_number,
            tx_count: params.tx_count,
            challenger: params.challenger,
            defender: params.defender,
            start: 0,
            end: params.tx_count,
            agreed_root: params.pre_state_root,
            defender_root: params.claimed_root,
            disclosed: None,
            round: 0,
            round_timeout: params.round_timeout,
            deadline: now.saturating_add(params.round_timeout),
            phase,
            verdict: Verdict::Undecided,
            resolution: None,
            stakes: params.stakes,
            opened_at: now,
            resolved_at: None,
            rounds: Vec::new(),
        })
    }

    /// Discloses the defender's root after transaction `mid_index - 1`.
    pub fn respond_bisection(
        &mut self,
        caller: Address,
        mid_index: u64,
        mid_root: B256,
        proof: Bytes,
        now: u64,
    ) -> DisputeResult<()> {
        self.check_action(GamePhase::AwaitingMidpoint, caller, now)?;

        let expected = self.midpoint();
        if mid_index != expected {
            return Err(DisputeError::InvalidMidpoint { expected, got: mid_index });
        }
        if mid_root.is_zero() {
            return Err(DisputeError::ZeroRoot);
        }

        self.disclosed = Some((mid_index, mid_root));
        self.rounds.push(RoundRecord {
            round: self.round,
            mid_index,
            mid_root,
            proof,
            disclosed_at: now,
            selected: None,
        });
        self.phase = GamePhase::AwaitingSelection;
        self.deadline = now.saturating_add(self.round_timeout);

        debug!(
            target: "dispute-game",
            "Game {} round {}: defender disclosed {} at index {}",
            self.id, self.round, mid_root, mid_index
        );
        Ok(())
    }

    /// Replaces the interval with the half the challenger still disputes.
    pub fn select_half(&mut self, caller: Address, half: Half, now: u64) -> DisputeResult<()> {
        self.check_action(GamePhase::AwaitingSelection, caller, now)?;

        // The selection phase is only entered after a disclosure.
        let Some((mid, mid_root)) = self.disclosed.take() else {
            return Err(DisputeError::WrongPhase(
                self.id,
                GamePhase::AwaitingSelection,
                GamePhase::AwaitingMidpoint,
            ));
        };
        match half {
            Half::Lower => {
                self.end = mid;
                self.defender_root = mid_root;
            }
            Half::Upper => {
                self.start = mid;
                self.agreed_root = mid_root;
            }
        }
        if let Some(record) = self.rounds.last_mut() {
            record.selected = Some(half);
        }

        self.round += 1;
        self.phase = if self.width() == 1 {
            GamePhase::AwaitingProof
        } else {
            GamePhase::AwaitingMidpoint
        };
        self.deadline = now.saturating_add(self.round_timeout);

        debug!(
            target: "dispute-game",
            "Game {} round {}: challenger selected {} half, interval [{}, {})",
            self.id, self.round, half, self.start, self.end
        );
        Ok(())
    }

    /// Forfeits the game for the due party if its deadline has passed at `now`. Returns the
    /// resulting verdict, or `None` if the game is resolved or still within its deadline.
    pub fn expire(&mut self, now: u64) -> Option<Verdict> {
        let due = self.phase.due()?;
        if now < self.deadline {
            return None;
        }

        warn!(
            target: "dispute-game",
            "Game {}: {} missed the deadline {} in round {}",
            self.id, due, self.deadline, self.round
        );
        self.finish(Verdict::for_party(due.opponent()), Resolution::Forfeit(due), now);
        Some(self.verdict)
    }

    /// Records the verdict of an adjudicated or forfeited game.
    ///
    /// Resolving an already resolved game changes nothing and returns the recorded verdict.
    pub fn resolve(
        &mut self,
        verdict: Verdict,
        resolution: Resolution,
        now: u64,
    ) -> DisputeResult<Verdict> {
        if self.is_resolved() {
            return Ok(self.verdict);
        }
        if !verdict.is_decided() {
            return Err(DisputeError::UndecidedVerdict);
        }
        if resolution == Resolution::Adjudicated && self.phase != GamePhase::AwaitingProof {
            return Err(DisputeError::WrongPhase(self.id, self.phase, GamePhase::AwaitingProof));
        }

        self.finish(verdict, resolution, now);
        Ok(self.verdict)
    }

    fn finish(&mut self, verdict: Verdict, resolution: Resolution, now: u64) {
        self.verdict = verdict;
        self.resolution = Some(resolution);
        self.phase = GamePhase::Resolved;
        self.resolved_at = Some(now);
        info!(target: "dispute-game", "Game {} resolved: {} ({})", self.id, verdict, resolution);
    }

    /// Returns the disputed transaction once bisection has converged.
    pub fn one_step(&self) -> DisputeResult<OneStepTarget> {
        if self.phase != GamePhase::AwaitingProof {
            return Err(DisputeError::WrongPhase(self.id, self.phase, GamePhase::AwaitingProof));
        }
        Ok(OneStepTarget {
            tx_index: self.start,
            pre_state_root: self.agreed_root,
            defender_post_root: self.defender_root,
        })
    }

    /// Moves the round deadline of an unresolved game back by `by` seconds.
    pub fn extend_deadline(&mut self, by: u64) {
        if !self.is_resolved() {
            self.deadline = self.deadline.saturating_add(by);
        }
    }

    fn check_action(&self, phase: GamePhase, caller: Address, now: u64) -> DisputeResult<()> {
        if self.phase != phase {
            return Err(DisputeError::WrongPhase(self.id, self.phase, phase));
        }
        if Some(caller) != self.phase.due().map(|party| self.address_of(party)) {
            return Err(DisputeError::NotYourTurn(caller, self.id));
        }
        self.ensure_before_deadline(now)
    }

    /// Fails with [DisputeError::DeadlinePassed] once the round deadline has been reached.
    pub const fn ensure_before_deadline(&self, now: u64) -> DisputeResult<()> {
        if now >= self.deadline {
            return Err(DisputeError::DeadlinePassed {
                game: self.id,
                deadline: self.deadline,
                now,
            });
        }
        Ok(())
    }

    /// Returns the midpoint the defender must disclose next.
    pub const fn midpoint(&self) -> u64 {
        self.start + (self.end - self.start) / 2
    }

    /// Returns the width of the disputed interval.
    pub const fn width(&self) -> u64 {
        self.end - self.start
    }

    /// Returns the address playing `party`.
    pub const fn address_of(&self, party: Party) -> Address {
        match party {
            Party::Challenger => self.challenger,
            Party::Defender => self.defender,
        }
    }

    /// Returns the game id.
    pub const fn id(&self) -> GameId {
        self.id
    }

    /// Returns the hash of the contested block.
    pub const fn block(&self) -> B256 {
        self.block
    }

    /// Returns the number of the contested block.
    pub const fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Returns the number of transactions in the contested block.
    pub const fn tx_count(&self) -> u64 {
        self.tx_count
    }

    /// Returns the challenger.
    pub const fn challenger(&self) -> Address {
        self.challenger
    }

    /// Returns the defender.
    pub const fn defender(&self) -> Address {
        self.defender
    }

    /// Returns the disputed interval `[start, end)`.
    pub const fn interval(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    /// Returns the root both parties agree on at the start of the interval.
    pub const fn agreed_root(&self) -> B256 {
        self.agreed_root
    }

    /// Returns the root the defender claims at the end of the interval.
    pub const fn defender_root(&self) -> B256 {
        self.defender_root
    }

    /// Returns the midpoint disclosure awaiting selection, if any.
    pub const fn disclosed(&self) -> Option<(u64, B256)> {
        self.disclosed
    }

    /// Returns the number of completed rounds.
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Returns the current round deadline.
    pub const fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Returns the phase.
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the party that must act next.
    pub const fn due(&self) -> Option<Party> {
        self.phase.due()
    }

    /// Returns the verdict.
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns how the verdict was reached.
    pub const fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Returns `true` once the game has a verdict.
    pub const fn is_resolved(&self) -> bool {
        matches!(self.phase, GamePhase::Resolved)
    }

    /// Returns the escrowed stakes.
    pub const fn stakes(&self) -> Stakes {
        self.stakes
    }

    /// Returns the settlement timestamp at which the game was opened.
    pub const fn opened_at(&self) -> u64 {
        self.opened_at
    }

    /// Returns the settlement timestamp at which the game was resolved.
    pub const fn resolved_at(&self) -> Option<u64> {
        self.resolved_at
    }

    /// Returns the log of midpoint disclosures.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }
}
