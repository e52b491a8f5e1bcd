//! This module contains the [GenesisAnchor] type.

use alloy_primitives::B256;

/// The agreed starting point of the rollup.
///
/// The anchor acts as block `0`: it is final by construction, and block `1` must name its hash as
/// the parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenesisAnchor {
    /// The hash of the genesis block.
    pub hash: B256,
    /// The state root of the genesis block.
    pub state_root: B256,
    /// The L2 timestamp of the genesis block.
    pub timestamp: u64,
}

impl GenesisAnchor {
    /// Creates a new [GenesisAnchor].
    pub const fn new(hash: B256, state_root: B256, timestamp: u64) -> Self {
        Self { hash, state_root, timestamp }
    }
}
