//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! [`Position`] is mutated only through the move-application entry points.
//! Each applied move pushes an undo record onto a history stack, so the
//! position can be walked back one ply at a time with
//! [`Position::undo_last_move`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU16;

use anyhow::{bail, Context};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::chess::attacks::LookupTables;
use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::bits::BOARD_WIDTH;
use crate::chess::core::{
    CastleRights, Move, MoveFlags, Piece, PieceKind, Player, Promotion, Rank, Square,
};
use crate::chess::movegen::{self, MoveList};
use crate::chess::san;
use crate::error::{Error, Result};

/// Number of halfmoves without captures or pawn moves after which a player may
/// claim a draw.
pub const FIFTY_MOVE_RULE_PLIES: u8 = 100;

/// Names one of the twelve piece bitboards or an aggregate occupancy mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitboardKey {
    /// Squares occupied by the given piece.
    Piece(Piece),
    /// Squares occupied by any piece.
    Occupied,
    /// Squares occupied by any piece of the player.
    Side(Player),
}

impl TryFrom<&str> for BitboardKey {
    type Error = Error;

    /// Accepts `<color>_<pieces>` names (e.g. `white_pawns`, `black_kings`)
    /// and the aggregates `all_white`, `all_black` and `all_pieces` (also
    /// spelled `white`, `black` and `occupied`).
    fn try_from(name: &str) -> Result<Self> {
        let unknown = || Error::UnknownBitboardKey(name.to_string());
        match name {
            "all_pieces" | "occupied" => return Ok(Self::Occupied),
            "all_white" | "white" => return Ok(Self::Side(Player::White)),
            "all_black" | "black" => return Ok(Self::Side(Player::Black)),
            _ => (),
        }
        let (color, pieces) = name.split_once('_').ok_or_else(unknown)?;
        let owner = match color {
            "white" => Player::White,
            "black" => Player::Black,
            _ => return Err(unknown()),
        };
        let kind = match pieces {
            "kings" => PieceKind::King,
            "queens" => PieceKind::Queen,
            "rooks" => PieceKind::Rook,
            "bishops" => PieceKind::Bishop,
            "knights" => PieceKind::Knight,
            "pawns" => PieceKind::Pawn,
            _ => return Err(unknown()),
        };
        Ok(Self::Piece(Piece::new(owner, kind)))
    }
}

/// Everything needed to take back one applied move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UndoRecord {
    /// Carries the captured piece, if any.
    applied: Move,
    castling: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
}

/// Canonical key of a position: piece placement, side to move, castling
/// rights and en passant target. Move history and clocks are not part of it.
///
/// [`Position`] equality and hashing go through this key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    /// Piece bitboards, White King to Black Pawn.
    pieces: [u64; 12],
    side_to_move: Player,
    castling: CastleRights,
    en_passant_square: Option<Square>,
}

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN) plus the
/// history of the moves applied to it.
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD format does not support [Operations]: only the
/// trimmed FEN lines (all FEN parts except Halfmove Clock and Fullmove
/// Counter) are accepted.
///
/// Cloning produces a fully independent copy, history included.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
    history: Vec<UndoRecord>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use bitmate::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty()
        }
    }

    /// Creates an empty board with White to move. Useful as a base for bulk
    /// setup with [`Position::set_bitboard`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
            history: Vec::new(),
        }
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Malformed input or a position that violates the board invariants (see
    /// [`Position::validate`]).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} is longer than {BOARD_WIDTH} squares");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                let square = Square::new(file.try_into()?, rank);
                result
                    .board
                    .player_pieces_mut(piece.owner)
                    .bitboard_for_mut(piece.kind)
                    .set(square);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        match parts.next() {
            Some(value) => {
                result.halfmove_clock = parse_counter(value)
                    .with_context(|| format!("incorrect FEN: halfmove clock {value}"))?;
                let Some(value) = parts.next() else {
                    bail!("incorrect FEN: missing fullmove counter");
                };
                result.fullmove_counter = parse_counter(value)
                    .with_context(|| format!("incorrect FEN: fullmove counter {value}"))?;
            },
            // This is a correct EPD.
            None => (),
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        result.validate()?;
        Ok(result)
    }

    /// Checks the invariants a position must hold to be played from: exactly
    /// one king per color, no more than 8 pawns per color, no pawns on the back
    /// ranks, the side not to move is not in check and the en passant target
    /// sits right behind a pawn that could have just been pushed.
    ///
    /// # Errors
    ///
    /// Describes the first violated invariant.
    pub fn validate(&self) -> anyhow::Result<()> {
        let tables = LookupTables::get();
        for player in Player::iter() {
            let color = match player {
                Player::White => "white",
                Player::Black => "black",
            };
            let pieces = self.board.player_pieces(player);
            if pieces.king.count() != 1 {
                bail!("expected 1 {color} king, got {}", pieces.king.count());
            }
            if pieces.pawns.count() > 8 {
                bail!("expected <= 8 {color} pawns, got {}", pieces.pawns.count());
            }
        }
        let backranks = tables.rank_mask(Rank::One) | tables.rank_mask(Rank::Eight);
        let pawns = self.board.white_pieces.pawns | self.board.black_pieces.pawns;
        if !(pawns & backranks).is_empty() {
            bail!("pawns can not be placed on backranks");
        }
        if self.board.in_check(self.side_to_move.opponent()) {
            bail!("the side not to move can not be in check");
        }
        if let Some(square) = self.en_passant_square {
            let they = self.side_to_move.opponent();
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if square.rank() != expected_rank {
                bail!(
                    "expected en passant square to be on rank {expected_rank}, got {}",
                    square.rank()
                );
            }
            let pushed = square.shift(they.push_direction());
            if !pushed.is_some_and(|pawn| self.board.player_pieces(they).pawns.contains(pawn)) {
                bail!("en passant square is not beyond pushed pawn");
            }
            if self.board.occupancy().contains(square) {
                bail!("en passant square {square} is occupied");
            }
        }
        Ok(())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Square passed over by the last double pawn push.
    #[must_use]
    pub const fn en_passant(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    pub(crate) const fn board(&self) -> &Board {
        &self.board
    }

    /// One of the twelve piece bitboards or an aggregate derived from them.
    #[must_use]
    pub fn bitboard(&self, key: BitboardKey) -> Bitboard {
        match key {
            BitboardKey::Piece(piece) => self.board.bitboard(piece),
            BitboardKey::Occupied => self.board.occupancy(),
            BitboardKey::Side(player) => self.board.side(player),
        }
    }

    /// Looks up a bitboard by its name, see [`BitboardKey::try_from`].
    ///
    /// # Errors
    ///
    /// [`Error::UnknownBitboardKey`] for names that do not denote a bitboard.
    pub fn bitboard_by_name(&self, name: &str) -> Result<Bitboard> {
        BitboardKey::try_from(name).map(|key| self.bitboard(key))
    }

    /// Overwrites one piece bitboard. This is the bulk setup path and performs
    /// no validation: the caller is responsible for keeping the piece sets
    /// disjoint and the kings unique. Aggregate masks are always derived from
    /// the piece sets, so they can not be overwritten. The move history is
    /// left as is; clear it by starting from a fresh position.
    pub fn set_bitboard(&mut self, piece: Piece, bitboard: Bitboard) {
        *self
            .board
            .player_pieces_mut(piece.owner)
            .bitboard_for_mut(piece.kind) = bitboard;
    }

    /// Overwrites the side to move, e.g. after bulk setup. Unchecked like
    /// [`Position::set_bitboard`].
    pub fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    /// Overwrites the castling rights. Unchecked like
    /// [`Position::set_bitboard`].
    pub fn set_castling(&mut self, castling: CastleRights) {
        self.castling = castling;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    /// Full legal move list for the side to move. Computed on every call.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Legal moves of the piece standing on `from`.
    #[must_use]
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = self.legal_moves();
        moves.retain(|mv| mv.from() == from);
        moves
    }

    /// Whether the king of the side to move is attacked.
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.board.in_check(self.side_to_move)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// A draw can be claimed under the fifty-move rule.
    #[must_use]
    pub const fn halfmove_clock_expired(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_RULE_PLIES
    }

    /// Number of moves that can be undone.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recently applied move.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.applied)
    }

    /// Applied moves, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|record| record.applied)
    }

    /// Canonical key used for equality and hashing.
    #[must_use]
    pub fn key(&self) -> PositionKey {
        let mut pieces = [0; 12];
        for (index, (owner, kind)) in Player::iter()
            .flat_map(|owner| PieceKind::iter().map(move |kind| (owner, kind)))
            .enumerate()
        {
            pieces[index] = self.board.bitboard(Piece::new(owner, kind)).bits();
        }
        PositionKey {
            pieces,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant_square: self.en_passant_square,
        }
    }

    /// Applies the move that takes the piece on `from` to `to`, promoting it
    /// if requested.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if no legal move matches. The position is left
    /// untouched in that case.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<Move> {
        let Some(found) = self
            .legal_moves_from(from)
            .into_iter()
            .find(|mv| mv.to() == to && mv.promotion() == promotion)
        else {
            tracing::debug!(%from, %to, ?promotion, "rejected illegal move");
            return Err(Error::IllegalMove {
                from,
                to,
                promotion,
            });
        };
        self.make_move(&found);
        Ok(found)
    }

    /// Resolves Standard Algebraic Notation against the legal moves and applies
    /// the only match.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousOrIllegalNotation`] unless exactly one legal move
    /// matches. The position is left untouched in that case.
    pub fn apply_san(&mut self, notation: &str) -> Result<Move> {
        let found = san::resolve(self, notation)?;
        self.make_move(&found);
        Ok(found)
    }

    /// Applies trusted moves, e.g. from a replay of a validated game. No
    /// legality check is performed: each move must come from
    /// [`Position::legal_moves`] of the position it is applied to.
    pub fn make_moves_unchecked(&mut self, moves: impl IntoIterator<Item = Move>) {
        for mv in moves {
            self.make_move(&mv);
        }
    }

    /// Takes back the most recent move.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyHistory`] if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> Result<Move> {
        let record = self.history.pop().ok_or(Error::EmptyHistory)?;
        self.board.revert(&record.applied);
        self.side_to_move = self.side_to_move.opponent();
        self.castling = record.castling;
        self.en_passant_square = record.en_passant_square;
        self.halfmove_clock = record.halfmove_clock;
        self.fullmove_counter = record.fullmove_counter;
        tracing::trace!(undone = %record.applied, "undo");
        Ok(record.applied)
    }

    fn make_move(&mut self, mv: &Move) {
        self.history.push(UndoRecord {
            applied: *mv,
            castling: self.castling,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_counter: self.fullmove_counter,
        });
        self.board.apply(mv);

        let us = mv.piece().owner;
        if mv.piece().kind == PieceKind::King {
            self.castling -= CastleRights::for_player(us);
        }
        // A rook leaving its original square and a capture on it both remove
        // the corresponding right.
        self.castling -= CastleRights::lost_with_rook_on(mv.from());
        self.castling -= CastleRights::lost_with_rook_on(mv.to());

        self.en_passant_square = if mv.flags().contains(MoveFlags::DOUBLE_PAWN_PUSH) {
            mv.from().shift(us.push_direction())
        } else {
            None
        };

        if mv.piece().kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = us.opponent();
        tracing::trace!(applied = %mv, "move");
    }
}

fn parse_counter<T: std::str::FromStr>(value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("counter can not contain anything other than digits");
    }
    Ok(value.parse::<T>()?)
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and strips optional `fen ` and `epd ` prefixes before
    /// handing it to [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "History: {}", self.moves().join(" "))?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}

/// [Perft] (performance test, move path enumeration): counts the leaf nodes of
/// the legal move tree of the given depth. The reference counts for well-known
/// positions are used to verify the move generator.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    let mut scratch = position.clone();
    perft_inner(&mut scratch, depth)
}

fn perft_inner(position: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for next in &moves {
        position.make_move(next);
        nodes += perft_inner(position, depth - 1);
        let undone = position.undo_last_move();
        debug_assert_eq!(undone.as_ref(), Ok(next));
    }
    nodes
}
