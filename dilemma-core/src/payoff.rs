//! Payoff matrix for a single round of the prisoner's dilemma
//!
//! Scores from the point of view of the row player:
//!
//! ```text
//!              them: C      them: D
//! me: C      [ 3, 3 ]     [ 0, 5 ]
//! me: D      [ 5, 0 ]     [ 1, 1 ]
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One move in the dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// The opposite move
    pub fn flipped(self) -> Move {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }

    /// Uniformly random move
    pub fn random<R: Rng>(rng: &mut R) -> Move {
        if rng.gen_bool(0.5) {
            Move::Cooperate
        } else {
            Move::Defect
        }
    }

    /// Single-character rendering ('c' / 'd')
    pub fn glyph(self) -> char {
        match self {
            Move::Cooperate => 'c',
            Move::Defect => 'd',
        }
    }
}

/// Mutual cooperation
pub const SCORE_CC: i64 = 3;
/// Cooperating against a defector (the sucker's payoff)
pub const SCORE_CD: i64 = 0;
/// Defecting against a cooperator (the temptation payoff)
pub const SCORE_DC: i64 = 5;
/// Mutual defection
pub const SCORE_DD: i64 = 1;

/// Energy a cell loses per simulation tick regardless of its interactions
pub const LOSS_PER_TICK: i64 = 2;

/// Score awarded to `mine` when played against `theirs`
pub fn payoff(mine: Move, theirs: Move) -> i64 {
    match (mine, theirs) {
        (Move::Cooperate, Move::Cooperate) => SCORE_CC,
        (Move::Cooperate, Move::Defect) => SCORE_CD,
        (Move::Defect, Move::Cooperate) => SCORE_DC,
        (Move::Defect, Move::Defect) => SCORE_DD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_table_exhaustive() {
        assert_eq!(payoff(Move::Cooperate, Move::Cooperate), 3);
        assert_eq!(payoff(Move::Cooperate, Move::Defect), 0);
        assert_eq!(payoff(Move::Defect, Move::Cooperate), 5);
        assert_eq!(payoff(Move::Defect, Move::Defect), 1);
    }

    #[test]
    fn test_flipped() {
        assert_eq!(Move::Cooperate.flipped(), Move::Defect);
        assert_eq!(Move::Defect.flipped(), Move::Cooperate);
    }
}
