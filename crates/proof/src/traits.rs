//! Traits for the `verdict-proof` crate.

use alloc::{boxed::Box, string::ToString, sync::Arc};
use alloy_primitives::B256;
use async_trait::async_trait;
use core::fmt::Display;

/// Describes the interface of the execution environment that re-executes a single transaction.
///
/// Implementations must be deterministic: the same inputs always produce the same root or the
/// same failure.
#[async_trait]
pub trait ReexecutionOracle {
    /// The error type for the [ReexecutionOracle].
    type Error: Display + ToString;

    /// Applies `transaction` to the state committed to by `pre_state_root` and returns the
    /// resulting state root. `witness` carries whatever auxiliary trace data the environment needs
    /// to reconstruct the pre-state.
    async fn execute(
        &self,
        pre_state_root: B256,
        transaction: &[u8],
        witness: &[u8],
    ) -> Result<B256, Self::Error>;
}

#[async_trait]
impl<O> ReexecutionOracle for Arc<O>
where
    O: ReexecutionOracle + Send + Sync + ?Sized,
{
    type Error = O::Error;

    async fn execute(
        &self,
        pre_state_root: B256,
        transaction: &[u8],
        witness: &[u8],
    ) -> Result<B256, Self::Error> {
        self.as_ref().execute(pre_state_root, transaction, witness).await
    }
}
