//! Cooperative timeout processing.
//!
//! Nothing in the protocol fires on its own. Expired dispute rounds, elapsed challenge windows and
//! interrupted cascades are all handled when a driver calls [Coordinator::tick] with the current
//! settlement time. Ticking twice at the same time changes nothing the second time.

use crate::{lifecycle, Coordinator, CoordinatorResult};
use alloy_primitives::B256;
use tracing::{debug, info};
use verdict_primitives::GameId;
use verdict_proof::ReexecutionOracle;

/// The effects of a [Coordinator::tick].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The blocks finalized, in number order.
    pub finalized: Vec<B256>,
    /// The blocks invalidated, by verdict or by cascade.
    pub invalidated: Vec<B256>,
    /// The games resolved by forfeit.
    pub forfeited: Vec<GameId>,
}

impl TickReport {
    /// Returns `true` if the tick changed nothing.
    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.invalidated.is_empty() && self.forfeited.is_empty()
    }
}

impl<O> Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Processes everything that became due at `now`.
    ///
    /// 1. Resumes a pending invalidation cascade.
    /// 2. Forfeits every open game whose due party missed its deadline and applies the verdict.
    /// 3. Finalizes eligible blocks in number order, stopping at the first block that is not.
    ///
    /// Every forfeit is committed on its own, so a tick that fails part way keeps the games it
    /// already concluded.
    pub fn tick(&mut self, now: u64) -> CoordinatorResult<TickReport> {
        let result = self.stage_tick(now);
        self.finish(result)
    }

    fn stage_tick(&mut self, now: u64) -> CoordinatorResult<TickReport> {
        self.ensure_running()?;
        let mut report = self.drain_cascade()?;

        for id in self.records.open_games()? {
            let mut game = self.game(id)?;
            if game.expire(now).is_some() {
                report.forfeited.push(id);
                self.conclude(&game, now, &mut report)?;
                self.commit()?;
            }
        }
        let cascaded = self.drain_cascade()?;
        report.invalidated.extend(cascaded.invalidated);

        self.finalize_eligible(now, &mut report)?;

        if !report.is_empty() {
            info!(
                target: "scheduler",
                "Tick at {}: {} finalized, {} invalidated, {} forfeited",
                now,
                report.finalized.len(),
                report.invalidated.len(),
                report.forfeited.len()
            );
        }
        Ok(report)
    }

    /// Walks the chain upward from the latest finalized block and finalizes every block that may
    /// be finalized at `now`.
    fn finalize_eligible(&mut self, now: u64, report: &mut TickReport) -> CoordinatorResult<()> {
        let mut number = self.ledger.latest_finalized_number()? + 1;
        while let Some(hash) = self.records.hash_at(number)? {
            let mut block = self.block_by_hash(hash)?;
            let verdict = self.verdict_of(&block)?;
            let parent_finalized = self.parent_finalized(&block)?;
            if let Err(reason) = lifecycle::check_finalize(&block, verdict, parent_finalized, now) {
                debug!(target: "scheduler", "Stopping finalization at #{}: {}", number, reason);
                break;
            }

            if self.finalize_block(&mut block, verdict, now)? == lifecycle::Transition::Applied {
                report.finalized.push(hash);
            }
            number += 1;
        }
        Ok(())
    }
}
