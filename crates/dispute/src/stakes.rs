//! Stake accounting for resolved dispute games.

use verdict_primitives::{Party, StakeSplit, BPS_DENOMINATOR};

/// The stakes escrowed by both parties of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stakes {
    /// The challenger's stake.
    pub challenger: u64,
    /// The defender's bond.
    pub defender: u64,
}

impl Stakes {
    /// Creates a new [Stakes].
    pub const fn new(challenger: u64, defender: u64) -> Self {
        Self { challenger, defender }
    }

    /// Returns the stake escrowed by `party`.
    pub const fn of(&self, party: Party) -> u64 {
        match party {
            Party::Challenger => self.challenger,
            Party::Defender => self.defender,
        }
    }

    /// Returns the sum of both stakes.
    pub const fn total(&self) -> u128 {
        self.challenger as u128 + self.defender as u128
    }
}

/// The distribution of the stakes of a resolved game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payout {
    /// The winning party.
    pub winner: Party,
    /// The amount credited to the winner: its own stake plus its share of the loser's.
    pub winner_amount: u64,
    /// The amount credited to the treasury.
    pub treasury_amount: u64,
}

/// Splits the stakes of a game won by `winner`.
///
/// The winner is refunded its own stake and receives `winner_bps` of the loser's stake; the
/// treasury receives the remainder, including any rounding dust.
pub fn settle(stakes: Stakes, winner: Party, split: StakeSplit) -> Payout {
    let loser_stake = stakes.of(winner.opponent()) as u128;
    let reward = loser_stake * split.winner_bps as u128 / BPS_DENOMINATOR as u128;
    // `reward <= loser_stake <= u64::MAX`, so neither cast truncates.
    let treasury_amount = (loser_stake - reward) as u64;
    let winner_amount = stakes.of(winner).saturating_add(reward as u64);
    Payout { winner, winner_amount, treasury_amount }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::{arbitrary::any, prop_assert_eq, proptest};

    #[test]
    fn test_proof_split() {
        let payout = settle(Stakes::new(1_000, 2_000), Party::Challenger, StakeSplit::PROOF);
        assert_eq!(payout.winner_amount, 1_000 + 1_600);
        assert_eq!(payout.treasury_amount, 400);
    }

    #[test]
    fn test_forfeit_split_rounds_toward_treasury() {
        let payout = settle(Stakes::new(1_000, 3), Party::Challenger, StakeSplit::FORFEIT);
        assert_eq!(payout.winner_amount, 1_001);
        assert_eq!(payout.treasury_amount, 2);
    }

    proptest! {
        #[test]
        fn settle_conserves_stakes(challenger in any::<u32>(), defender in any::<u32>(), winner_bps in 0u16..=10_000, challenger_wins in any::<bool>()) {
            let stakes = Stakes::new(challenger as u64, defender as u64);
            let winner = if challenger_wins { Party::Challenger } else { Party::Defender };
            let split = StakeSplit::new(winner_bps, 10_000 - winner_bps);

            let payout = settle(stakes, winner, split);
            prop_assert_eq!(payout.winner_amount as u128 + payout.treasury_amount as u128, stakes.total());
        }
    }
}
