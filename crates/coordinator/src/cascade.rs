//! Batched invalidation of the descendants of an invalidated block.
//!
//! Once a block is invalidated, every block built on top of it is invalid as well. The chain
//! above the origin is walked by number, following parent links, and processed in batches of
//! `cascade_batch_size` blocks. Every batch is committed together with the updated [CascadeCursor],
//! so a cascade interrupted by a crash resumes where it stopped on the next [Coordinator::open] or
//! [Coordinator::tick].
//!
//! [Coordinator::tick]: crate::Coordinator::tick

use crate::{
    lifecycle::{self, Invalidation, Transition},
    Coordinator, CoordinatorResult, TickReport,
};
use alloy_primitives::B256;
use tracing::{debug, info};
use verdict_primitives::Block;
use verdict_proof::ReexecutionOracle;

/// The progress of an invalidation cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CascadeCursor {
    /// The hash of the block whose invalidation started the cascade.
    pub origin: B256,
    /// The number of the origin block.
    pub origin_number: u64,
    /// The number of the next descendant to visit.
    pub next_number: u64,
    /// The hash of the last invalidated block. The next descendant must link to it.
    pub last_hash: B256,
}

impl CascadeCursor {
    /// Starts a cascade from the freshly invalidated `origin`.
    pub const fn new(origin: &Block) -> Self {
        Self {
            origin: origin.proposal.hash,
            origin_number: origin.proposal.number,
            next_number: origin.proposal.number + 1,
            last_hash: origin.proposal.hash,
        }
    }
}

impl<O> Coordinator<O>
where
    O: ReexecutionOracle + Send + Sync,
{
    /// Returns the cursor of the cascade in progress, if any.
    pub fn pending_cascade(&self) -> CoordinatorResult<Option<CascadeCursor>> {
        self.records.cursor()
    }

    /// Invalidates the next batch of descendants of the pending cascade.
    ///
    /// Returns the cursor of the remaining work, or `None` once the cascade is complete.
    pub fn cascade_step(&mut self) -> CoordinatorResult<Option<CascadeCursor>> {
        let mut report = TickReport::default();
        let result = self.run_cascade_batch(&mut report);
        self.finish(result)
    }

    /// Runs the pending cascade to completion.
    pub(crate) fn drain_cascade(&mut self) -> CoordinatorResult<TickReport> {
        let mut report = TickReport::default();
        while self.run_cascade_batch(&mut report)?.is_some() {}
        Ok(report)
    }

    /// Invalidates one batch of descendants and commits it with everything staged before it.
    pub(crate) fn run_cascade_batch(
        &mut self,
        report: &mut TickReport,
    ) -> CoordinatorResult<Option<CascadeCursor>> {
        let Some(mut cursor) = self.records.cursor()? else {
            return Ok(None);
        };

        let batch_size = self.config.cascade_batch_size.max(1);
        let mut complete = false;
        for _ in 0..batch_size {
            let Some(mut block) = self.next_descendant(&cursor)? else {
                complete = true;
                break;
            };
            if lifecycle::invalidate(&mut block, Invalidation::Ancestor)? == Transition::Applied {
                self.retire(&block, cursor.origin)?;
                report.invalidated.push(block.hash());
                debug!(
                    target: "cascade",
                    "Invalidated descendant #{} ({}) of {}",
                    block.number(),
                    block.hash(),
                    cursor.origin
                );
            }
            cursor.next_number += 1;
            cursor.last_hash = block.hash();
        }

        if !complete && self.next_descendant(&cursor)?.is_none() {
            complete = true;
        }
        if complete {
            self.records.set_cursor(None)?;
            self.commit()?;
            info!(
                target: "cascade",
                "Cascade from block #{} ({}) complete, {} descendants invalidated",
                cursor.origin_number,
                cursor.origin,
                cursor.next_number - cursor.origin_number - 1
            );
            return Ok(None);
        }

        self.records.set_cursor(Some(&cursor))?;
        self.commit()?;
        debug!(
            target: "cascade",
            "Cascade from {} paused before block #{}",
            cursor.origin,
            cursor.next_number
        );
        Ok(Some(cursor))
    }

    /// Returns the live block at the cursor's next number if it descends from the last
    /// invalidated block.
    fn next_descendant(&self, cursor: &CascadeCursor) -> CoordinatorResult<Option<Block>> {
        let Some(hash) = self.records.hash_at(cursor.next_number)? else {
            return Ok(None);
        };
        let block = self.block_by_hash(hash)?;
        Ok((block.parent_hash() == cursor.last_hash).then_some(block))
    }
}
