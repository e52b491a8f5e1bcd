//! The administrative surface of the [Coordinator].
//!
//! Every call here requires the configured admin identity and keeps working while the protocol is
//! paused. Configuration changes are validated and persisted before they take effect, and are
//! announced with a [ProtocolEvent::ConfigUpdated] event. They apply to blocks proposed and games
//! opened afterwards.

use crate::{Coordinator, CoordinatorError, CoordinatorResult};
use alloy_primitives::Address;
use tracing::{info, warn};
use verdict_primitives::{BlockStatus, ProtocolConfig, ProtocolEvent};
use verdict_proof::ReexecutionOracle;

/// Whether mutating calls are paused, and since when.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PauseState {
    /// The settlement timestamp at which the protocol was paused.
    pub paused_at: Option<u64>,
}

impl PauseState {
    /// Returns `true` while paused.
    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}

impl<O> Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Returns the current [PauseState].
    pub fn pause_state(&self) -> CoordinatorResult<PauseState> {
        self.records.pause()
    }

    pub(crate) fn ensure_running(&self) -> CoordinatorResult<()> {
        if self.records.pause()?.is_paused() {
            return Err(CoordinatorError::Paused);
        }
        Ok(())
    }

    fn ensure_admin(&self, caller: Address, action: &'static str) -> CoordinatorResult<()> {
        if caller != self.config.admin {
            warn!(target: "coordinator", "Rejected {} from non-admin {}", action, caller);
            return Err(CoordinatorError::Unauthorized(caller, action));
        }
        Ok(())
    }

    /// Validates and persists a modified copy of the configuration.
    fn update_config(
        &mut self,
        parameter: &'static str,
        apply: impl FnOnce(&mut ProtocolConfig),
    ) -> CoordinatorResult<()> {
        let mut config = self.config.clone();
        apply(&mut config);
        config.validate()?;
        self.records.put_config(&config)?;
        self.emit(ProtocolEvent::ConfigUpdated { parameter: parameter.to_string() });
        self.commit()?;
        self.config = config;

        info!(target: "coordinator", "Updated {}", parameter);
        Ok(())
    }

    /// Sets the challenge period for blocks proposed from now on.
    pub fn set_challenge_period(&mut self, caller: Address, period: u64) -> CoordinatorResult<()> {
        self.ensure_admin(caller, "set_challenge_period")?;
        let result = self.update_config("challenge_period", |config| config.challenge_period = period);
        self.finish(result)
    }

    /// Sets the round timeout for games opened from now on.
    pub fn set_round_timeout(&mut self, caller: Address, timeout: u64) -> CoordinatorResult<()> {
        self.ensure_admin(caller, "set_round_timeout")?;
        let result = self.update_config("round_timeout", |config| config.round_timeout = timeout);
        self.finish(result)
    }

    /// Replaces the registered proposer.
    pub fn set_proposer(&mut self, caller: Address, proposer: Address) -> CoordinatorResult<()> {
        self.ensure_admin(caller, "set_proposer")?;
        let result = self.update_config("proposer", |config| config.proposer = proposer);
        self.finish(result)?;
        self.ledger.set_proposer(proposer);
        Ok(())
    }

    /// Restricts finalization to `finalizer`, or opens it to anyone with `None`.
    pub fn set_finalizer(
        &mut self,
        caller: Address,
        finalizer: Option<Address>,
    ) -> CoordinatorResult<()> {
        self.ensure_admin(caller, "set_finalizer")?;
        let result = self.update_config("finalizer", |config| config.finalizer = finalizer);
        self.finish(result)
    }

    /// Pauses every non-admin mutating call. Pausing while paused is a no-op.
    pub fn pause(&mut self, caller: Address, now: u64) -> CoordinatorResult<()> {
        let result = self.stage_pause(caller, now);
        self.finish(result)
    }

    fn stage_pause(&mut self, caller: Address, now: u64) -> CoordinatorResult<()> {
        self.ensure_admin(caller, "pause")?;
        if self.records.pause()?.is_paused() {
            return Ok(());
        }

        self.records.set_pause(&PauseState { paused_at: Some(now) })?;
        warn!(target: "coordinator", "Protocol paused at {}", now);
        self.emit(ProtocolEvent::Paused { at: now });
        Ok(())
    }

    /// Resumes the protocol and pushes back the deadlines of Proposed blocks and open games by the
    /// time spent paused, so that no party loses time to the pause. Returns the extension.
    ///
    /// Unpausing while running is a no-op.
    pub fn unpause(&mut self, caller: Address, now: u64) -> CoordinatorResult<u64> {
        let result = self.stage_unpause(caller, now);
        self.finish(result)
    }

    fn stage_unpause(&mut self, caller: Address, now: u64) -> CoordinatorResult<u64> {
        self.ensure_admin(caller, "unpause")?;
        let Some(paused_at) = self.records.pause()?.paused_at else {
            return Ok(0);
        };
        let extension = now.saturating_sub(paused_at);

        if extension > 0 {
            let head = self.records.head()?;
            for number in self.ledger.latest_finalized_number()? + 1..=head {
                let Some(hash) = self.records.hash_at(number)? else { continue };
                let mut block = self.block_by_hash(hash)?;
                if block.status == BlockStatus::Proposed {
                    block.deadline = block.deadline.saturating_add(extension);
                    self.records.put_block(&block)?;
                }
            }
            for id in self.records.open_games()? {
                let mut game = self.game(id)?;
                game.extend_deadline(extension);
                self.records.put_game(&game)?;
            }
        }

        self.records.set_pause(&PauseState::default())?;
        info!(target: "coordinator", "Protocol unpaused at {}, deadlines extended by {}", now, extension);
        self.emit(ProtocolEvent::Unpaused { at: now, extended_by: extension });
        Ok(extension)
    }
}
