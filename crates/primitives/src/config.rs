//! This module contains the [ProtocolConfig] type.

use crate::{
    ConfigError, ConfigResult, GenesisAnchor, BPS_DENOMINATOR, DEFAULT_CASCADE_BATCH_SIZE,
    DEFAULT_CHALLENGE_PERIOD, DEFAULT_ROUND_TIMEOUT, MIN_CHALLENGE_PERIOD,
};
use alloy_primitives::Address;
#[cfg(feature = "serde")]
use alloc::string::ToString;

/// How the loser's stake of a dispute game is split, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeSplit {
    /// The share paid to the winner.
    pub winner_bps: u16,
    /// The share paid to the treasury.
    pub treasury_bps: u16,
}

impl StakeSplit {
    /// The default split for games decided by a one-step fraud proof.
    pub const PROOF: Self = Self::new(8_000, 2_000);

    /// The default split for games decided by a missed round deadline.
    pub const FORFEIT: Self = Self::new(5_000, 5_000);

    /// Creates a new [StakeSplit].
    pub const fn new(winner_bps: u16, treasury_bps: u16) -> Self {
        Self { winner_bps, treasury_bps }
    }

    /// Returns the sum of both shares.
    pub const fn total_bps(&self) -> u64 {
        self.winner_bps as u64 + self.treasury_bps as u64
    }
}

/// The parameters of a deployment.
///
/// The config is resolved once at startup and handed to the coordinator. Afterwards only the
/// administrative surface may change the challenge period, round timeout and identities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProtocolConfig {
    /// The finalized starting point of the rollup.
    pub genesis: GenesisAnchor,
    /// The challenge window of a proposed block, in seconds.
    pub challenge_period: u64,
    /// The time a dispute participant has to act, in seconds.
    pub round_timeout: u64,
    /// The minimum stake a challenger must post to open a game.
    pub min_challenge_stake: u64,
    /// The bond backing every proposal, forfeited to a successful challenger.
    pub proposer_bond: u64,
    /// Stake split for games decided by a one-step proof.
    pub proof_split: StakeSplit,
    /// Stake split for games decided by a missed deadline.
    pub forfeit_split: StakeSplit,
    /// The identity allowed to use the administrative surface.
    pub admin: Address,
    /// The identity allowed to propose blocks.
    pub proposer: Address,
    /// The identity allowed to finalize blocks explicitly. `None` makes finalization
    /// permissionless.
    pub finalizer: Option<Address>,
    /// The recipient of the treasury share of forfeited stakes.
    pub treasury: Address,
    /// The number of descendant blocks processed per invalidation cascade batch.
    pub cascade_batch_size: u64,
    /// When set, a block may only be proposed on top of a finalized parent.
    pub strict_parent_finality: bool,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            genesis: GenesisAnchor::default(),
            challenge_period: DEFAULT_CHALLENGE_PERIOD,
            round_timeout: DEFAULT_ROUND_TIMEOUT,
            min_challenge_stake: 0,
            proposer_bond: 0,
            proof_split: StakeSplit::PROOF,
            forfeit_split: StakeSplit::FORFEIT,
            admin: Address::ZERO,
            proposer: Address::ZERO,
            finalizer: None,
            treasury: Address::ZERO,
            cascade_batch_size: DEFAULT_CASCADE_BATCH_SIZE,
            strict_parent_finality: false,
        }
    }
}

impl ProtocolConfig {
    /// Checks that every parameter is within its allowed range.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.challenge_period < MIN_CHALLENGE_PERIOD {
            return Err(ConfigError::ChallengePeriodTooShort(
                self.challenge_period,
                MIN_CHALLENGE_PERIOD,
            ));
        }
        if self.round_timeout == 0 {
            return Err(ConfigError::ZeroRoundTimeout);
        }
        if self.proof_split.total_bps() != BPS_DENOMINATOR {
            return Err(ConfigError::InvalidStakeSplit("proof", self.proof_split.total_bps()));
        }
        if self.forfeit_split.total_bps() != BPS_DENOMINATOR {
            return Err(ConfigError::InvalidStakeSplit("forfeit", self.forfeit_split.total_bps()));
        }
        if self.cascade_batch_size == 0 {
            return Err(ConfigError::ZeroCascadeBatch);
        }
        if self.genesis.state_root.is_zero() {
            return Err(ConfigError::ZeroGenesisRoot);
        }
        for (name, identity) in
            [("admin", self.admin), ("proposer", self.proposer), ("treasury", self.treasury)]
        {
            if identity.is_zero() {
                return Err(ConfigError::MissingIdentity(name));
            }
        }
        Ok(())
    }

    /// Parses a [ProtocolConfig] from a JSON document and validates it. Missing fields take their
    /// default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns `true` if `caller` may explicitly finalize blocks.
    pub fn may_finalize(&self, caller: Address) -> bool {
        self.finalizer.map_or(true, |finalizer| finalizer == caller)
    }
}
