use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::Neg;

/// The score represents the value of the position (in centipawns) from White's
/// perspective or a forced checkmate in N plies (if one is found).
///
/// A compact i32 representation is used to store the score in both cases:
/// the values close to the ends of the range are reserved for mates, so that
/// any mate compares above (or below) every material evaluation and a faster
/// mate compares above a slower one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    value: i32,
}

impl Score {
    /// Neutral score of a stalemate.
    pub const DRAW: Self = Self { value: 0 };
    /// Bound of every score: `(-INFINITY, INFINITY)` is the full search
    /// window.
    pub const INFINITY: Self = Self {
        value: 2_000_000_000,
    };
    /// `[-INFINITY, -INFINITY + MATE_RANGE]` and `[INFINITY - MATE_RANGE,
    /// INFINITY]` are reserved for mate scores.
    /// `(-INFINITY + MATE_RANGE, INFINITY - MATE_RANGE)` is for centipawn
    /// evaluations.
    const MATE_RANGE: i32 = 1000;

    /// Creates a new score in centipawn units.
    ///
    /// # Panics
    ///
    /// The value must be in the range `(-INFINITY + MATE_RANGE, INFINITY -
    /// MATE_RANGE)`.
    #[must_use]
    pub fn cp(value: i32) -> Self {
        assert!(value.abs() < Self::INFINITY.value - Self::MATE_RANGE);
        Self { value }
    }

    /// Creates a new score representing White's victory `plies` half-moves
    /// away from the root of the search. Negate it for Black's victory.
    #[must_use]
    pub fn mate(plies: u8) -> Self {
        Self {
            value: Self::INFINITY.value - i32::from(plies),
        }
    }

    /// Returns the number of plies until mate: positive if White mates,
    /// negative if Black does.
    ///
    /// # Panics
    ///
    /// Panics if the score is not a mate score.
    #[must_use]
    pub fn mate_in(&self) -> i32 {
        assert!(self.is_mate());
        let plies = Self::INFINITY.value - self.value.abs();
        match self.value.cmp(&0) {
            Ordering::Less => -plies,
            _ => plies,
        }
    }

    /// Returns `true` if the score represents a mate, not centipawn evaluation.
    #[must_use]
    pub fn is_mate(&self) -> bool {
        self.value.abs() >= Self::INFINITY.value - Self::MATE_RANGE
    }

    /// Centipawn value, meaningless for mate scores.
    #[must_use]
    pub const fn centipawns(&self) -> i32 {
        self.value
    }
}

impl Neg for Score {
    type Output = Self;

    /// Mirrors evaluation to other player's perspective.
    fn neg(self) -> Self::Output {
        Self { value: -self.value }
    }
}

impl Display for Score {
    /// Formats the score the way UCI does: centipawns or mate in full moves.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_mate() {
            let plies = self.mate_in();
            let moves = (plies.abs() + 1) / 2;
            write!(f, "mate {}", if plies < 0 { -moves } else { moves })
        } else {
            write!(f, "cp {}", self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mate() {
        assert!(Score::mate(42).is_mate());
        assert_eq!(Score::mate(42).mate_in(), 42);
        assert_eq!(Score::mate(0).mate_in(), 0);
        assert!(Score::mate(1) > Score::mate(3));
        assert!(-Score::mate(1) < -Score::mate(3));
    }

    #[test]
    fn cp() {
        let cp = Score::cp(42);
        assert_eq!(cp, Score { value: 42 });
        assert!(!cp.is_mate());
        assert_eq!(cp.centipawns(), 42);

        assert!(Score::cp(42) < Score::cp(43));
        assert!(Score::cp(0) > Score::cp(-42));
        assert_eq!(Score::cp(0), Score::DRAW);
    }

    #[test]
    fn neg() {
        let cp = Score::cp(42);
        assert_eq!(-cp, Score { value: -42 });

        assert_eq!(Score::mate(42).mate_in(), 42);
        assert_eq!((-Score::mate(42)).mate_in(), -42);
    }

    #[test]
    fn display() {
        assert_eq!(Score::cp(123).to_string(), "cp 123");
        assert_eq!(Score::cp(-5).to_string(), "cp -5");
        assert_eq!(Score::mate(1).to_string(), "mate 1");
        assert_eq!(Score::mate(3).to_string(), "mate 2");
        assert_eq!((-Score::mate(4)).to_string(), "mate -2");
    }

    #[test]
    fn mate_vs_cp() {
        assert!(Score::mate(42) > Score::cp(42));
        assert!(-Score::mate(1) < Score::cp(-42_000));
        assert!(Score::mate(2) > Score::cp(-42));
    }

    #[test]
    #[should_panic]
    fn cp_panic() {
        let _ = Score::cp(Score::INFINITY.value - Score::MATE_RANGE);
    }
}
