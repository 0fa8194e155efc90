//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

use crate::chess::bits::{file_of, rank_of, BOARD_WIDTH};

/// Number of squares on the board.
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use bitmate::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use bitmate::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::from_index(file as u8 + (rank as u8) * BOARD_WIDTH)
    }

    /// Converts a bit index into a square. The index is wrapped into `0..64`,
    /// so callers pass values produced by bit scans.
    #[must_use]
    pub(crate) const fn from_index(index: u8) -> Self {
        // SAFETY: Square is `repr(u8)` with 64 variants and the index is
        // masked into 0..64.
        unsafe { mem::transmute(index & (BOARD_SIZE - 1)) }
    }

    /// Index of the square in `0..64`, matching the bit position in a
    /// [`crate::chess::bitboard::Bitboard`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::from_index(file_of(self as u8))
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::from_index(rank_of(self as u8))
    }

    /// Neighbouring square in the given direction or [`None`] if it would be
    /// off the board.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        let file = file_of(self as u8) as i8 + file_delta;
        let rank = rank_of(self as u8) as i8 + rank_delta;
        if file < 0 || file >= BOARD_WIDTH as i8 || rank < 0 || rank >= BOARD_WIDTH as i8 {
            return None;
        }
        Some(Self::from_index(file as u8 + rank as u8 * BOARD_WIDTH))
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        if square_index >= BOARD_SIZE {
            bail!("square index should be in 0..BOARD_SIZE, got {square_index}");
        }
        Ok(Self::from_index(square_index))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    const fn from_index(column: u8) -> Self {
        // SAFETY: File is `repr(u8)` with 8 variants and the index is masked
        // into 0..8.
        unsafe { mem::transmute(column & (BOARD_WIDTH - 1)) }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(Self::from_index(file as u8 - b'a')),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(Self::from_index(column)),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    const fn from_index(row: u8) -> Self {
        // SAFETY: Rank is `repr(u8)` with 8 variants and the index is masked
        // into 0..8.
        unsafe { mem::transmute(row & (BOARD_WIDTH - 1)) }
    }

    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start and may push two squares from.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The rank where the player's pawns promote.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::from_index(rank as u8 - b'1')),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(Self::from_index(row)),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Uppercase letter used by the algebraic notation. Pawns have none.
    #[must_use]
    pub const fn san_symbol(self) -> Option<char> {
        match self {
            Self::King => Some('K'),
            Self::Queen => Some('Q'),
            Self::Rook => Some('R'),
            Self::Bishop => Some('B'),
            Self::Knight => Some('N'),
            Self::Pawn => None,
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    /// White pieces are uppercase, black pieces are lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        f.write_char(match self.owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        })
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured on its original square, player loses ability to
    /// castle its corresponding side.
    ///
    /// The king and the rook end up on the same files for both sides:
    ///
    /// - When castling h-side (short), the king ends up on [`File::G`] and the
    ///   rook on [`File::F`]
    /// - When castling a-side (long), the king ends up on [`File::C`] and the
    ///   rook on [`File::D`]
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Both rights of a single player.
    #[must_use]
    pub const fn for_player(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }

    /// Right that is lost when the rook on `square` moves or gets captured.
    #[must_use]
    pub const fn lost_with_rook_on(square: Square) -> Self {
        match square {
            Square::H1 => Self::WHITE_SHORT,
            Square::A1 => Self::WHITE_LONG,
            Square::H8 => Self::BLACK_SHORT,
            Square::A8 => Self::BLACK_LONG,
            _ => Self::empty(),
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format. The user
    /// is responsible for providing valid input cleaned up from the actual FEN
    /// chunk.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given pattern does not match
    ///
    /// [`CastleRights`] := "-" | (K)? (Q)? (k)? (q)?
    fn try_from(input: &str) -> anyhow::Result<Self> {
        const ORDER: [(char, CastleRights); 4] = [
            ('K', CastleRights::WHITE_SHORT),
            ('Q', CastleRights::WHITE_LONG),
            ('k', CastleRights::BLACK_SHORT),
            ('q', CastleRights::BLACK_LONG),
        ];
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        let mut expected = ORDER.iter();
        for symbol in input.chars() {
            match expected.find(|(candidate, _)| *candidate == symbol) {
                Some((_, right)) => rights |= *right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        if rights.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    /// Accepts both UCI (lowercase) and SAN (uppercase) symbols.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions. "Left" is towards
/// [`File::A`], "Up" is towards [`Rank::Eight`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as North.
    Up,
    /// Also known as `NorthEast`.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as `SouthEast`.
    DownRight,
    /// Also known as South.
    Down,
    /// Also known as `SouthWest`.
    DownLeft,
    /// Also known as West.
    Left,
    /// Also known as `NorthWest`.
    UpLeft,
}

impl Direction {
    /// Directions a rook slides in.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];
    /// Directions a bishop slides in.
    pub const DIAGONAL: [Self; 4] = [Self::UpRight, Self::DownRight, Self::DownLeft, Self::UpLeft];

    /// (file, rank) step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::DownRight => (1, -1),
            Self::Down => (0, -1),
            Self::DownLeft => (-1, -1),
            Self::Left => (-1, 0),
            Self::UpLeft => (-1, 1),
        }
    }

    /// Whether stepping in this direction increases the square index. The
    /// nearest blocker on a ray is its lowest set bit for such directions and
    /// the highest set bit otherwise.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Up | Self::UpRight | Self::Right | Self::UpLeft)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// Extra information about a [`Move`] that makes it possible to apply and
    /// revert it without re-inspecting the board, and to print it in
    /// human-readable format (e.g. Standard Algebraic Notation).
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (when it
    ///   advances two squares from its original position). It is always
    ///   flagged as a capture, too.
    /// - The [Castle] move that will involve a king and a rook "jumping" over
    ///   each other. Technically, castling is a king move, so `from` and `to`
    ///   move squares will correspond to the king.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// Moves that change the material balance.
        const CAPTURE = 0b0000_0001;
        /// Pawn captures a pawn that has just been pushed two squares.
        const EN_PASSANT = 0b0000_0010;
        /// King moves two squares towards a rook that jumps over it.
        const CASTLE = 0b0000_0100;
        /// Pawn reaches the last rank and turns into another piece.
        const PROMOTION = 0b0000_1000;
        /// Pawn advancement by 2 squares from the original rank (second for
        /// white and seventh for black).
        const DOUBLE_PAWN_PUSH = 0b0001_0000;
    }
}

/// Represents any kind of a legal chess move. A move is the only way to mutate
/// [`crate::chess::position::Position`] in normal play. Moves are immutable
/// and carry everything needed to apply and revert them on the board.
///
/// The [`fmt::Display`] representation is UCI (`e2e4`, `e7e8q`, `e1g1` for the
/// white short castle). For a move to be serialized in Standard Algebraic
/// Notation (SAN), it also requires the position it will be applied in, see
/// [`crate::chess::san::to_san`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<PieceKind>,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    /// Assembles a move. [`MoveFlags::CAPTURE`] and [`MoveFlags::PROMOTION`]
    /// are derived from `captured` and `promotion`.
    #[must_use]
    pub fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<PieceKind>,
        promotion: Option<Promotion>,
        flags: MoveFlags,
    ) -> Self {
        let mut flags = flags;
        flags.set(MoveFlags::CAPTURE, captured.is_some());
        flags.set(MoveFlags::PROMOTION, promotion.is_some());
        Self {
            from,
            to,
            piece,
            captured,
            promotion,
            flags,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece that moves (the pawn for promotions).
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The captured piece kind. For en passant this is the pawn that is
    /// removed from the square behind `to`.
    #[must_use]
    pub const fn captured(&self) -> Option<PieceKind> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    /// Square of the captured piece. Differs from [`Move::to`] only for en
    /// passant.
    #[must_use]
    pub const fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// Rook origin and destination for castling moves.
    #[must_use]
    pub const fn castle_rook_squares(&self) -> Option<(Square, Square)> {
        if !self.is_castle() {
            return None;
        }
        match self.to {
            Square::G1 => Some((Square::H1, Square::F1)),
            Square::C1 => Some((Square::A1, Square::D1)),
            Square::G8 => Some((Square::H8, Square::F8)),
            Square::C8 => Some((Square::A8, Square::D8)),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::mem::size_of;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('0'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| Rank::try_from(idx).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
        assert_eq!(Rank::promotion(Player::White), Rank::Eight);
        assert_eq!(Rank::pawns_starting(Player::Black), Rank::Seven);
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within 0..BOARD_WIDTH, got 8")]
    fn rank_from_incorrect_index() {
        let _ = Rank::try_from(BOARD_WIDTH).unwrap();
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            File::iter().collect::<Vec<_>>()
        );
        assert_eq!(File::H.to_string(), "h");
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3]
        );
        assert_eq!(Square::new(File::E, Rank::Four), Square::E4);
        assert_eq!(Square::try_from("g7").unwrap(), Square::G7);
        assert!(Square::try_from("g9").is_err());
        assert!(Square::try_from("e").is_err());
        assert_eq!(Square::C6.to_string(), "c6");
        assert!(Square::iter().all(|square| Square::new(square.file(), square.rank()) == square));
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn square_from_incorrect_index() {
        let _ = Square::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Square>(), 1);
        assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
    }

    #[test]
    fn shift() {
        let square = Square::E4;
        assert_eq!(square.shift(Direction::Left), Some(Square::D4));
        assert_eq!(square.shift(Direction::Up), Some(Square::E5));
        assert_eq!(square.shift(Direction::UpRight), Some(Square::F5));
        assert_eq!(square.shift(Direction::UpLeft), Some(Square::D5));
        assert_eq!(square.shift(Direction::Right), Some(Square::F4));
        assert_eq!(square.shift(Direction::Down), Some(Square::E3));
        assert_eq!(square.shift(Direction::DownRight), Some(Square::F3));
        assert_eq!(square.shift(Direction::DownLeft), Some(Square::D3));

        for direction in [Direction::Left, Direction::UpLeft, Direction::DownLeft] {
            assert_eq!(Square::A5.shift(direction), None);
        }
        for direction in [Direction::Right, Direction::UpRight, Direction::DownRight] {
            assert_eq!(Square::H5.shift(direction), None);
        }
        assert_eq!(Square::H8.shift(Direction::Up), None);
        assert_eq!(Square::A1.shift(Direction::Down), None);
        assert_eq!(Square::H1.shift(Direction::UpLeft), Some(Square::G2));
    }

    #[test]
    fn direction_sign_matches_index_change() {
        for direction in Direction::iter() {
            let next = Square::D4.shift(direction).unwrap();
            assert_eq!(direction.is_positive(), next > Square::D4, "{direction:?}");
        }
    }

    #[test]
    fn pieces() {
        for symbol in "KQRBNPkqrbnp".chars() {
            assert_eq!(Piece::try_from(symbol).unwrap().to_string(), symbol.to_string());
        }
        assert!(Piece::try_from('x').is_err());
        assert_eq!(
            Piece::try_from('n').unwrap(),
            Piece::new(Player::Black, PieceKind::Knight)
        );
    }

    #[test]
    fn castle_rights() {
        assert_eq!(CastleRights::try_from("-").unwrap(), CastleRights::empty());
        assert_eq!(CastleRights::try_from("KQkq").unwrap(), CastleRights::ALL);
        assert_eq!(
            CastleRights::try_from("Kq").unwrap(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG
        );
        assert!(CastleRights::try_from("qK").is_err());
        assert!(CastleRights::try_from("KK").is_err());
        assert!(CastleRights::try_from("").is_err());
        assert_eq!(CastleRights::ALL.to_string(), "KQkq");
        assert_eq!(CastleRights::BLACK_BOTH.to_string(), "kq");
        assert_eq!(CastleRights::empty().to_string(), "-");
        assert_eq!(
            CastleRights::lost_with_rook_on(Square::A8),
            CastleRights::BLACK_LONG
        );
        assert_eq!(CastleRights::lost_with_rook_on(Square::B8), CastleRights::empty());
    }

    #[test]
    fn move_details() {
        let white_pawn = Piece::new(Player::White, PieceKind::Pawn);
        let push = Move::new(
            Square::E2,
            Square::E4,
            white_pawn,
            None,
            None,
            MoveFlags::DOUBLE_PAWN_PUSH,
        );
        assert_eq!(push.to_string(), "e2e4");
        assert!(!push.is_capture());

        let promotion = Move::new(
            Square::B7,
            Square::A8,
            white_pawn,
            Some(PieceKind::Rook),
            Some(Promotion::Knight),
            MoveFlags::empty(),
        );
        assert_eq!(promotion.to_string(), "b7a8n");
        assert_eq!(
            promotion.flags(),
            MoveFlags::CAPTURE | MoveFlags::PROMOTION
        );

        let en_passant = Move::new(
            Square::E5,
            Square::D6,
            white_pawn,
            Some(PieceKind::Pawn),
            None,
            MoveFlags::EN_PASSANT,
        );
        assert_eq!(en_passant.capture_square(), Square::D5);

        let castle = Move::new(
            Square::E8,
            Square::C8,
            Piece::new(Player::Black, PieceKind::King),
            None,
            None,
            MoveFlags::CASTLE,
        );
        assert_eq!(castle.castle_rook_squares(), Some((Square::A8, Square::D8)));
        assert_eq!(castle.to_string(), "e8c8");
    }
}
