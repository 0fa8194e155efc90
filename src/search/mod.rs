//! Fixed-depth game tree search. The only algorithm is [`minimax`]: minimax
//! with [Alpha-Beta pruning] over the material evaluation.
//!
//! [Alpha-Beta pruning]: https://www.chessprogramming.org/Alpha-Beta

use crate::chess::core::{Move, Player};
use crate::chess::position::Position;
use crate::evaluation::Score;

pub mod minimax;

/// Search depth in plies.
pub type Depth = u8;

/// Depth used when no limit is given.
pub const DEFAULT_DEPTH: Depth = 4;

/// Constraints of a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Number of plies to look ahead. Zero returns the static evaluation of
    /// the root.
    pub depth: Depth,
}

impl Limits {
    /// Searches exactly `depth` plies.
    #[must_use]
    pub const fn depth(depth: Depth) -> Self {
        Self { depth }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH)
    }
}

/// Outcome of the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// White-relative value of the root.
    pub score: Score,
    /// `None` only at depth 0 or when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Number of positions visited, root included.
    pub nodes: u64,
}

/// Searches `position` for the side to move: White maximizes the score, Black
/// minimizes it. The position itself is never modified.
#[must_use]
pub fn go(position: &Position, limits: Limits) -> SearchResult {
    let maximizing = position.side_to_move() == Player::White;
    minimax::search_best_move(position, limits.depth, maximizing)
}
