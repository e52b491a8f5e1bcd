//! Outcome types shared by the dispute game and its consumers.

use crate::Party;
use core::fmt::{Display, Formatter};

/// The half of a bisection interval a party selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Half {
    /// `[start, mid)`: the parties agree at `start` but disagree at `mid`.
    Lower,
    /// `[mid, end)`: the parties agree at `mid`.
    Upper,
}

impl Display for Half {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
        }
    }
}

/// The verdict of a dispute game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// The game is still running.
    #[default]
    Undecided,
    /// The block was shown to be invalid.
    ChallengerWins,
    /// The block stood.
    DefenderWins,
}

impl Verdict {
    /// Returns the winning [Party], if the game is decided.
    pub const fn winner(&self) -> Option<Party> {
        match self {
            Self::Undecided => None,
            Self::ChallengerWins => Some(Party::Challenger),
            Self::DefenderWins => Some(Party::Defender),
        }
    }

    /// Returns the verdict in favour of `party`.
    pub const fn for_party(party: Party) -> Self {
        match party {
            Party::Challenger => Self::ChallengerWins,
            Party::Defender => Self::DefenderWins,
        }
    }

    /// Returns `true` if the game has been decided.
    pub const fn is_decided(&self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Undecided => write!(f, "undecided"),
            Self::ChallengerWins => write!(f, "challenger-wins"),
            Self::DefenderWins => write!(f, "defender-wins"),
        }
    }
}

/// How a dispute game reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// The one-step fraud proof was adjudicated.
    Adjudicated,
    /// The given party missed its round deadline.
    Forfeit(Party),
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Adjudicated => write!(f, "adjudicated"),
            Self::Forfeit(party) => write!(f, "forfeit by {party}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_verdict_winner() {
        assert_eq!(Verdict::Undecided.winner(), None);
        assert_eq!(Verdict::ChallengerWins.winner(), Some(Party::Challenger));
        assert_eq!(Verdict::for_party(Party::Defender), Verdict::DefenderWins);
        assert!(!Verdict::default().is_decided());
    }

    #[test]
    fn test_forfeit_display() {
        assert_eq!(
            alloc::format!("{}", Resolution::Forfeit(Party::Defender)),
            "forfeit by defender"
        );
    }
}
