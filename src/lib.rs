//! Bitboard chess position engine: board representation, legal move
//! generation, move application with undo and a fixed-depth alpha-beta search
//! on top of a material evaluation.
//!
//! ```
//! use bitmate::chess::position::Position;
//! use bitmate::search::{self, Limits};
//!
//! let mut position = Position::starting();
//! let _ = position.apply_san("e4").unwrap();
//! let _ = position.apply_san("e5").unwrap();
//! assert_eq!(position.legal_moves().len(), 29);
//!
//! let result = search::go(&position, Limits::depth(2));
//! assert!(result.best_move.is_some());
//! ```

pub mod chess;
pub mod error;
pub mod evaluation;
pub mod search;

pub use error::{Error, Result};
