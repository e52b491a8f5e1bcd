//! Error types for the `verdict-primitives` crate.

use alloc::string::String;
use thiserror::Error;

/// An error returned when a [ProtocolConfig] is out of range.
///
/// [ProtocolConfig]: crate::ProtocolConfig
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The challenge period is below the protocol minimum.
    #[error("Challenge period of {0}s is below the minimum of {1}s")]
    ChallengePeriodTooShort(u64, u64),
    /// Round timeouts must be non-zero.
    #[error("Round timeout must be non-zero")]
    ZeroRoundTimeout,
    /// A stake split does not distribute exactly the whole stake.
    #[error("Stake split `{0}` must sum to 10000 basis points, got {1}")]
    InvalidStakeSplit(&'static str, u64),
    /// The cascade batch size must be non-zero.
    #[error("Cascade batch size must be non-zero")]
    ZeroCascadeBatch,
    /// A required identity is unset.
    #[error("Missing identity: {0}")]
    MissingIdentity(&'static str),
    /// The genesis anchor has a zero state root.
    #[error("Genesis state root must be non-zero")]
    ZeroGenesisRoot,
    /// The configuration document could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// A [Result] alias for the [ConfigError] type.
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;
