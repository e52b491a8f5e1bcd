//! Test utilities for `verdict-proof`.

#![allow(missing_docs, unreachable_pub)]

use crate::ReexecutionOracle;
use alloc::{boxed::Box, collections::BTreeSet, sync::Arc, vec::Vec};
use alloy_primitives::{keccak256, B256};
use async_trait::async_trait;
use core::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// A deterministic execution environment: the post-state root of a transaction is
/// `keccak256(pre_state_root ‖ keccak256(transaction))`.
#[derive(Debug, Clone, Default)]
pub struct MockReexecutionOracle {
    failing: BTreeSet<Vec<u8>>,
    executions: Arc<AtomicUsize>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transaction reverted during re-execution")]
pub struct MockExecutionError;

impl MockReexecutionOracle {
    /// Makes re-execution of `transaction` fail.
    pub fn failing_on(mut self, transaction: &[u8]) -> Self {
        self.failing.insert(transaction.to_vec());
        self
    }

    /// Returns the root after applying `transaction` to `pre_state_root`.
    pub fn transition(&self, pre_state_root: B256, transaction: &[u8]) -> B256 {
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(pre_state_root.as_slice());
        raw[32..].copy_from_slice(keccak256(transaction).as_slice());
        keccak256(raw)
    }

    /// Replays `transactions` from `pre_state_root`, returning the root after each one.
    pub fn replay<T: AsRef<[u8]>>(&self, pre_state_root: B256, transactions: &[T]) -> Vec<B256> {
        transactions
            .iter()
            .scan(pre_state_root, |root, tx| {
                *root = self.transition(*root, tx.as_ref());
                Some(*root)
            })
            .collect()
    }

    /// Returns the number of executions performed through [ReexecutionOracle::execute].
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReexecutionOracle for MockReexecutionOracle {
    type Error = MockExecutionError;

    async fn execute(
        &self,
        pre_state_root: B256,
        transaction: &[u8],
        _witness: &[u8],
    ) -> Result<B256, Self::Error> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(transaction) {
            return Err(MockExecutionError);
        }
        Ok(self.transition(pre_state_root, transaction))
    }
}
