//! Identifiers for protocol entities and the [Party] roles of a dispute.

use core::fmt::{Display, Formatter};

/// Identifies a dispute game.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
)]
#[display("{_0}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct GameId(pub u64);

impl GameId {
    /// Returns the identifier that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Identifies a fraud proof claim.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
)]
#[display("{_0}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct ClaimId(pub u64);

impl ClaimId {
    /// Returns the identifier that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The stable arena index of an output record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
)]
#[display("{_0}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct OutputIndex(pub u64);

impl OutputIndex {
    /// Returns the index that follows this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The two sides of a dispute game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Party {
    /// The party contesting the block.
    Challenger,
    /// The proposer of the contested block.
    Defender,
}

impl Party {
    /// Returns the other side.
    pub const fn opponent(&self) -> Self {
        match self {
            Self::Challenger => Self::Defender,
            Self::Defender => Self::Challenger,
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Challenger => write!(f, "challenger"),
            Self::Defender => write!(f, "defender"),
        }
    }
}
