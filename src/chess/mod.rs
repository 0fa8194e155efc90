//! Implementation of chess environment, its rules and specifics.

pub mod attacks;
pub mod bitboard;
pub mod bits;
pub mod core;
pub mod movegen;
pub mod position;
pub mod san;
