//! Bit arithmetic over raw 64-bit boards: square index decoding and set-bit
//! enumeration. Higher-level types ([`crate::chess::bitboard::Bitboard`],
//! [`crate::chess::core::Square`]) are built on top of these.

use crate::error::{Error, Result};

/// Number of squares in a rank or a file.
pub const BOARD_WIDTH: u8 = 8;

/// Returns the rank (0-based row) of a square index in `0..64`.
#[must_use]
pub const fn rank_of(square: u8) -> u8 {
    square / BOARD_WIDTH
}

/// Returns the file (0-based column) of a square index in `0..64`.
#[must_use]
pub const fn file_of(square: u8) -> u8 {
    square % BOARD_WIDTH
}

/// Index of the lowest set bit.
///
/// # Errors
///
/// [`Error::EmptyBitboard`] when `bits == 0`: there is no index to return and
/// any sentinel would collide with a real square.
pub fn least_significant_bit(bits: u64) -> Result<u8> {
    if bits == 0 {
        return Err(Error::EmptyBitboard);
    }
    Ok(bits.trailing_zeros() as u8)
}

/// Index of the highest set bit.
///
/// # Errors
///
/// [`Error::EmptyBitboard`] when `bits == 0`.
pub fn most_significant_bit(bits: u64) -> Result<u8> {
    if bits == 0 {
        return Err(Error::EmptyBitboard);
    }
    Ok(63 - bits.leading_zeros() as u8)
}

/// Enumerates set bits in ascending order. The iterator is [`Clone`], so the
/// sequence can be restarted from any point.
#[must_use]
pub const fn bit_positions(bits: u64) -> BitPositions {
    BitPositions { bits }
}

/// Iterator returned by [`bit_positions`].
#[derive(Clone, Copy, Debug)]
pub struct BitPositions {
    bits: u64,
}

impl Iterator for BitPositions {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let next_index = self.bits.trailing_zeros() as u8;
        // Clear the lowest set bit.
        self.bits &= self.bits - 1;
        Some(next_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitPositions {}

impl std::iter::FusedIterator for BitPositions {}
