//! This module implements "static" [evaluation], i.e. predicting the relative
//! value/score of given position without [`crate::search`].
//!
//! The score is returned in centipawn units from White's perspective: positive
//! values favor White regardless of the side to move.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

pub mod material;
pub mod score;

pub use score::Score;

use crate::chess::position::Position;

/// Static evaluation of the position.
#[must_use]
pub fn evaluate(position: &Position) -> Score {
    Score::cp(material::material_advantage(position))
}
