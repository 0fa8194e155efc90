//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. This
//! results in very efficient calculation of possible attack vectors and other
//! meaningful features that are calculated to evaluate a position on the board.
//! The disadvantage is inefficiency of some operations like "get piece type on
//! given square" (efficiently handled by Square-centric board
//! implementations).
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::{self, Write};
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Sub, SubAssign,
};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::chess::attacks::LookupTables;
use crate::chess::bits::{self, BitPositions};
use crate::chess::core::{File, Move, Piece, PieceKind, Player, Rank, Square};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant
/// bit corresponds to A1, and the most significant bit - to H8.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Self::empty(), |result, square| result | Self::from(*square))
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Lowest set square, [`None`] for an empty set.
    #[must_use]
    pub fn first(self) -> Option<Square> {
        bits::least_significant_bit(self.bits)
            .ok()
            .map(Square::from_index)
    }

    /// Highest set square, [`None`] for an empty set.
    #[must_use]
    pub fn last(self) -> Option<Square> {
        bits::most_significant_bit(self.bits)
            .ok()
            .map(Square::from_index)
    }

    /// An efficient way to iterate over the set squares, from A1 towards H8.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator {
            positions: bits::bit_positions(self.bits),
        }
    }

    #[allow(missing_docs)]
    pub fn set(&mut self, square: Square) {
        *self |= Self::from(square);
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self, square: Square) {
        *self -= Self::from(square);
    }
}

impl fmt::Debug for Bitboard {
    /// Prints the set as an 8x8 grid, rank 8 on top: `1` for set squares and
    /// `.` for the rest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = Rank::iter()
            .rev()
            .map(|rank| {
                File::iter()
                    .map(|file| {
                        if self.contains(Square::new(file, rank)) {
                            '1'
                        } else {
                            '.'
                        }
                    })
                    .join(SQUARE_SEPARATOR)
            })
            .join(LINE_SEPARATOR);
        f.write_str(&grid)
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits.bitand_assign(rhs.bits);
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitxor(rhs.bits))
    }
}

impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits.bitxor_assign(rhs.bits);
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [`BitScan`]: https://www.chessprogramming.org/BitScan
#[derive(Clone, Copy, Debug)]
pub struct BitboardIterator {
    positions: BitPositions,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.positions.next().map(Square::from_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for BitboardIterator {}

/// Piece-centric representation of all material owned by one player. Uses
/// [Bitboard] to store a set of squares occupied by each piece. The main user
/// is [`Board`], [Bitboard] is not very useful on its own.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Pieces {
    pub(crate) king: Bitboard,
    pub(crate) queens: Bitboard,
    pub(crate) rooks: Bitboard,
    pub(crate) bishops: Bitboard,
    pub(crate) knights: Bitboard,
    pub(crate) pawns: Bitboard,
}

impl Pieces {
    fn starting(player: Player) -> Self {
        let backrank = LookupTables::get().rank_mask(Rank::backrank(player));
        let on_backrank = |files: &[File]| {
            files.iter().fold(Bitboard::empty(), |result, file| {
                result | LookupTables::get().file_mask(*file)
            }) & backrank
        };
        Self {
            king: on_backrank(&[File::E]),
            queens: on_backrank(&[File::D]),
            rooks: on_backrank(&[File::A, File::H]),
            bishops: on_backrank(&[File::C, File::F]),
            knights: on_backrank(&[File::B, File::G]),
            pawns: LookupTables::get().rank_mask(Rank::pawns_starting(player)),
        }
    }

    pub(crate) fn all(&self) -> Bitboard {
        self.king | self.queens | self.rooks | self.bishops | self.knights | self.pawns
    }

    pub(crate) const fn bitboard_for(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queens,
            PieceKind::Rook => self.rooks,
            PieceKind::Bishop => self.bishops,
            PieceKind::Knight => self.knights,
            PieceKind::Pawn => self.pawns,
        }
    }

    pub(crate) fn bitboard_for_mut(&mut self, kind: PieceKind) -> &mut Bitboard {
        match kind {
            PieceKind::King => &mut self.king,
            PieceKind::Queen => &mut self.queens,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Pawn => &mut self.pawns,
        }
    }

    pub(crate) fn at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::iter().find(|kind| self.bitboard_for(*kind).contains(square))
    }
}

/// Piece-centric implementation of the chess board: twelve disjoint piece
/// bitboards. Occupancy masks are derived on demand, so they always equal the
/// union of the piece sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Board {
    pub(crate) white_pieces: Pieces,
    pub(crate) black_pieces: Pieces,
}

impl Board {
    #[must_use]
    pub(crate) fn starting() -> Self {
        Self {
            white_pieces: Pieces::starting(Player::White),
            black_pieces: Pieces::starting(Player::Black),
        }
    }

    /// Constructs an empty Board to be filled by the position builder.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub(crate) const fn player_pieces(&self, player: Player) -> &Pieces {
        match player {
            Player::White => &self.white_pieces,
            Player::Black => &self.black_pieces,
        }
    }

    pub(crate) fn player_pieces_mut(&mut self, player: Player) -> &mut Pieces {
        match player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        }
    }

    pub(crate) const fn bitboard(&self, piece: Piece) -> Bitboard {
        self.player_pieces(piece.owner).bitboard_for(piece.kind)
    }

    pub(crate) fn side(&self, player: Player) -> Bitboard {
        self.player_pieces(player).all()
    }

    pub(crate) fn occupancy(&self) -> Bitboard {
        self.white_pieces.all() | self.black_pieces.all()
    }

    /// Linear in the number of piece kinds: fine for notation and queries,
    /// move generation never needs it.
    #[must_use]
    pub(crate) fn at(&self, square: Square) -> Option<Piece> {
        if let Some(kind) = self.white_pieces.at(square) {
            return Some(Piece::new(Player::White, kind));
        }
        self.black_pieces
            .at(square)
            .map(|kind| Piece::new(Player::Black, kind))
    }

    pub(crate) fn king(&self, player: Player) -> Option<Square> {
        self.player_pieces(player).king.first()
    }

    /// All pieces of `by` that attack `square` given the current occupancy.
    pub(crate) fn attackers(&self, square: Square, by: Player) -> Bitboard {
        let tables = LookupTables::get();
        let occupancy = self.occupancy();
        let pieces = self.player_pieces(by);
        let straight = pieces.rooks | pieces.queens;
        let diagonal = pieces.bishops | pieces.queens;
        // A pawn of `by` attacks the square iff a pawn of the other color
        // standing on that square would attack the pawn.
        (tables.pawn_attacks(by.opponent(), square) & pieces.pawns)
            | (tables.knight_attacks(square) & pieces.knights)
            | (tables.king_attacks(square) & pieces.king)
            | (tables.rook_attacks(square, occupancy) & straight)
            | (tables.bishop_attacks(square, occupancy) & diagonal)
    }

    pub(crate) fn is_attacked(&self, square: Square, by: Player) -> bool {
        !self.attackers(square, by).is_empty()
    }

    /// Whether the king of `player` is attacked. A board without that king is
    /// never in check.
    pub(crate) fn in_check(&self, player: Player) -> bool {
        self.king(player)
            .is_some_and(|king| self.is_attacked(king, player.opponent()))
    }

    /// Moves the pieces of `mv` (including the castling rook, the en passant
    /// victim and the promoted piece). Side to move and other position state
    /// are handled by the caller.
    pub(crate) fn apply(&mut self, mv: &Move) {
        let us = mv.piece().owner;
        if let Some(captured) = mv.captured() {
            self.player_pieces_mut(us.opponent())
                .bitboard_for_mut(captured)
                .clear(mv.capture_square());
        }
        let ours = self.player_pieces_mut(us);
        ours.bitboard_for_mut(mv.piece().kind).clear(mv.from());
        let landed = mv.promotion().map_or(mv.piece().kind, PieceKind::from);
        ours.bitboard_for_mut(landed).set(mv.to());
        if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
            ours.rooks.clear(rook_from);
            ours.rooks.set(rook_to);
        }
    }

    /// Exact inverse of [`Board::apply`].
    pub(crate) fn revert(&mut self, mv: &Move) {
        let us = mv.piece().owner;
        let ours = self.player_pieces_mut(us);
        if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
            ours.rooks.clear(rook_to);
            ours.rooks.set(rook_from);
        }
        let landed = mv.promotion().map_or(mv.piece().kind, PieceKind::from);
        ours.bitboard_for_mut(landed).clear(mv.to());
        ours.bitboard_for_mut(mv.piece().kind).set(mv.from());
        if let Some(captured) = mv.captured() {
            self.player_pieces_mut(us.opponent())
                .bitboard_for_mut(captured)
                .set(mv.capture_square());
        }
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                let square = Square::new(file, rank);
                if let Some(piece) = self.at(square) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != Rank::One {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
