//! Provides a very basic implementation of evaluation based on material
//! advantage using "[standard piece valuations]".
//!
//! While not very useful in practice, this evaluation function is great for
//! testing search and other infrastructure, because it is stable (will not
//! change because of the fixed piece "values"), easy to understand and
//! deterministic.
//!
//! The king weight dwarfs everything else: it cancels out in any legal
//! position and only matters for incomplete boards built with
//! [`crate::chess::position::Position::set_bitboard`].
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use strum::IntoEnumIterator;

use crate::chess::core::{Piece, PieceKind, Player};
use crate::chess::position::{BitboardKey, Position};

#[allow(missing_docs)]
pub const PAWN_VALUE: i32 = 100;
#[allow(missing_docs)]
pub const KNIGHT_VALUE: i32 = 300;
#[allow(missing_docs)]
pub const BISHOP_VALUE: i32 = 300;
#[allow(missing_docs)]
pub const ROOK_VALUE: i32 = 500;
#[allow(missing_docs)]
pub const QUEEN_VALUE: i32 = 900;
#[allow(missing_docs)]
pub const KING_VALUE: i32 = 20_000;

/// Material weight of a single piece of the given kind.
#[must_use]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => KING_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Pawn => PAWN_VALUE,
    }
}

fn player_material(position: &Position, player: Player) -> i32 {
    PieceKind::iter()
        .map(|kind| {
            let count = position
                .bitboard(BitboardKey::Piece(Piece::new(player, kind)))
                .count();
            piece_value(kind) * count as i32
        })
        .sum()
}

/// White's material minus Black's material, in centipawns.
#[must_use]
pub fn material_advantage(position: &Position) -> i32 {
    player_material(position, Player::White) - player_material(position, Player::Black)
}
