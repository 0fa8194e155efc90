//! Errors reported by the position and move-application API.
//!
//! Every failure is local and synchronous: the operation that returns an
//! [`Error`] leaves the [`crate::chess::position::Position`] untouched.

use thiserror::Error;

use crate::chess::core::{Promotion, Square};

/// Failures of the core chess API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bitboard lookup by a name that does not match any piece or aggregate
    /// mask.
    #[error("unknown bitboard key: {0:?}")]
    UnknownBitboardKey(String),

    /// The requested move is not in the legal move list of the position.
    #[error("illegal move: {from}{to} (promotion: {promotion:?})")]
    IllegalMove {
        /// Origin square.
        from: Square,
        /// Destination square.
        to: Square,
        /// Requested promotion, if any.
        promotion: Option<Promotion>,
    },

    /// Notation matched zero or several legal moves.
    #[error("notation {notation:?} matches {candidates} legal moves, expected exactly 1")]
    AmbiguousOrIllegalNotation {
        /// Input as provided by the caller.
        notation: String,
        /// Number of legal moves matching the input.
        candidates: usize,
    },

    /// There are no applied moves left to undo.
    #[error("move history is empty")]
    EmptyHistory,

    /// Least significant bit of an empty bitboard was requested.
    #[error("bitboard has no set bits")]
    EmptyBitboard,
}

/// Result of the fallible core operations.
pub type Result<T> = std::result::Result<T, Error>;
