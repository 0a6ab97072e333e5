//! See [`Score`]

use std::fmt;

/// Score for a won position, from the maximizing side's perspective
pub const WIN_SCORE: i32 = 10_000;
/// Score for a lost position, from the maximizing side's perspective
pub const LOSS_SCORE: i32 = -10_000;
/// Score for a drawn position
pub const DRAW_SCORE: i32 = 0;

/// Score evaluation for a position
///
/// Scores are always from the perspective of the maximizing side,
/// so positive scores favor it, and negative scores favor the minimizing side.
/// Only finished games produce a non-zero score: there is no partial credit.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Score(i32);

impl Score {
    /// The maximizing side has won
    pub const WIN: Self = Self(WIN_SCORE);
    /// The minimizing side has won
    pub const LOSS: Self = Self(LOSS_SCORE);
    /// A finished game with no winner, or an unfinished one
    pub const DRAW: Self = Self(DRAW_SCORE);

    /// Lower than every real score, used as the initial best for the maximizing side
    pub const MIN: Self = Self(i32::MIN);
    /// Higher than every real score, used as the initial best for the minimizing side
    pub const MAX: Self = Self(i32::MAX);

    /// Initial alpha for a root search, just below [`Self::LOSS`]
    pub const ALPHA_START: Self = Self(LOSS_SCORE - 1);
    /// Initial beta for a root search, just above [`Self::WIN`]
    pub const BETA_START: Self = Self(WIN_SCORE + 1);

    #[inline]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Whether this score settles the game for one side
    #[inline]
    pub fn is_decisive(self) -> bool {
        self.0 != DRAW_SCORE
    }
}

impl From<Score> for i32 {
    fn from(value: Score) -> Self {
        value.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
