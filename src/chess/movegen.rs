//! Move [generation]: one pseudo-legal generator per piece kind, parameterized
//! by the moving player, and a legality filter on top of them.
//!
//! Pseudo-legal moves follow the movement geometry of the pieces but may leave
//! the mover's king in check. [`legal_moves`] plays every candidate on a
//! scratch copy of the board and keeps the ones after which the king is safe.
//!
//! The output order is stable: pieces are visited King, Queen, Rook, Bishop,
//! Knight, Pawn; origins and destinations are visited from A1 towards H8;
//! promotions come as Queen, Rook, Bishop, Knight; castling moves follow the
//! regular king moves, short before long.
//!
//! [generation]: https://www.chessprogramming.org/Move_Generation

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::chess::attacks::LookupTables;
use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::core::{
    CastleRights, File, Move, MoveFlags, Piece, PieceKind, Player, Promotion, Rank, Square,
};
use crate::chess::position::Position;

/// No reachable chess position has more than 218 legal moves; the capacity
/// leaves room for pseudo-legal candidates.
pub const MAX_MOVES: usize = 256;

/// Moves are stored on the stack.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Full legal move list for the side to move.
#[must_use]
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position, position.side_to_move());
    moves.retain(|candidate| keeps_king_safe(position.board(), candidate));
    moves
}

/// Union of the per-piece generators for `player`. En passant is only
/// available to the side to move.
#[must_use]
pub fn pseudo_legal_moves(position: &Position, player: Player) -> MoveList {
    let mut moves = MoveList::new();
    for kind in PieceKind::iter() {
        generate(position, player, kind, &mut moves);
    }
    moves
}

/// Appends pseudo-legal moves of all `kind` pieces of `player`.
pub fn generate(position: &Position, player: Player, kind: PieceKind, moves: &mut MoveList) {
    match kind {
        PieceKind::King => king_moves(position, player, moves),
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight => {
            piece_moves(position.board(), Piece::new(player, kind), moves);
        },
        PieceKind::Pawn => pawn_moves(position, player, moves),
    }
}

fn keeps_king_safe(board: &Board, candidate: &Move) -> bool {
    let mut scratch = *board;
    scratch.apply(candidate);
    !scratch.in_check(candidate.piece().owner)
}

fn targets(board: &Board, piece: Piece, from: Square) -> Bitboard {
    let tables = LookupTables::get();
    let occupancy = board.occupancy();
    let attacks = match piece.kind {
        PieceKind::King => tables.king_attacks(from),
        PieceKind::Queen => tables.queen_attacks(from, occupancy),
        PieceKind::Rook => tables.rook_attacks(from, occupancy),
        PieceKind::Bishop => tables.bishop_attacks(from, occupancy),
        PieceKind::Knight => tables.knight_attacks(from),
        PieceKind::Pawn => tables.pawn_attacks(piece.owner, from),
    };
    attacks - board.side(piece.owner)
}

fn captured_at(board: &Board, player: Player, square: Square) -> Option<PieceKind> {
    board.player_pieces(player.opponent()).at(square)
}

/// Knight and sliding piece moves: every reachable square that is not occupied
/// by a piece of the same color.
fn piece_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for from in board.bitboard(piece) {
        for to in targets(board, piece, from) {
            moves.push(Move::new(
                from,
                to,
                piece,
                captured_at(board, piece.owner, to),
                None,
                MoveFlags::empty(),
            ));
        }
    }
}

fn king_moves(position: &Position, player: Player, moves: &mut MoveList) {
    let board = position.board();
    piece_moves(board, Piece::new(player, PieceKind::King), moves);
    castle_moves(board, position.castling(), player, moves);
}

struct CastleSide {
    /// Indexed by [`Player::index`].
    rights: [CastleRights; 2],
    rook: File,
    king_destination: File,
    /// Files that must be empty between the king and the rook.
    between: &'static [File],
    /// Files the king stands on, passes through and lands on.
    king_path: &'static [File],
}

const SHORT: CastleSide = CastleSide {
    rights: [CastleRights::WHITE_SHORT, CastleRights::BLACK_SHORT],
    rook: File::H,
    king_destination: File::G,
    between: &[File::F, File::G],
    king_path: &[File::E, File::F, File::G],
};

const LONG: CastleSide = CastleSide {
    rights: [CastleRights::WHITE_LONG, CastleRights::BLACK_LONG],
    rook: File::A,
    king_destination: File::C,
    between: &[File::B, File::C, File::D],
    king_path: &[File::E, File::D, File::C],
};

/// Castling is a king move flagged [`MoveFlags::CASTLE`]. It is generated only
/// if the right is held, the king and the rook are on their original squares,
/// the squares between them are empty and none of the squares the king
/// touches is attacked.
fn castle_moves(board: &Board, castling: CastleRights, player: Player, moves: &mut MoveList) {
    let backrank = Rank::backrank(player);
    let king = Square::new(File::E, backrank);
    let ours = board.player_pieces(player);
    if !ours.king.contains(king) {
        return;
    }
    let occupancy = board.occupancy();
    for side in [SHORT, LONG] {
        if !castling.contains(side.rights[player.index()]) {
            continue;
        }
        if !ours.rooks.contains(Square::new(side.rook, backrank)) {
            continue;
        }
        if side
            .between
            .iter()
            .any(|file| occupancy.contains(Square::new(*file, backrank)))
        {
            continue;
        }
        if side
            .king_path
            .iter()
            .any(|file| board.is_attacked(Square::new(*file, backrank), player.opponent()))
        {
            continue;
        }
        moves.push(Move::new(
            king,
            Square::new(side.king_destination, backrank),
            Piece::new(player, PieceKind::King),
            None,
            None,
            MoveFlags::CASTLE,
        ));
    }
}

/// Single and double pushes, diagonal captures, en passant onto the current
/// target square and promotions on the last rank.
fn pawn_moves(position: &Position, player: Player, moves: &mut MoveList) {
    let board = position.board();
    let pawn = Piece::new(player, PieceKind::Pawn);
    let occupancy = board.occupancy();
    let push = player.push_direction();
    let en_passant = position
        .en_passant()
        .filter(|_| player == position.side_to_move());
    for from in board.bitboard(pawn) {
        let mut destinations = targets(board, pawn, from) & board.side(player.opponent());
        let mut double_push = None;
        if let Some(single) = from.shift(push).filter(|to| !occupancy.contains(*to)) {
            destinations.set(single);
            if from.rank() == Rank::pawns_starting(player) {
                double_push = single.shift(push).filter(|to| !occupancy.contains(*to));
            }
        }
        if let Some(double) = double_push {
            destinations.set(double);
        }
        let en_passant = en_passant.filter(|target| {
            LookupTables::get().pawn_attacks(player, from).contains(*target)
                && !occupancy.contains(*target)
                && board
                    .player_pieces(player.opponent())
                    .pawns
                    .contains(Square::new(target.file(), from.rank()))
        });
        if let Some(target) = en_passant {
            destinations.set(target);
        }
        for to in destinations {
            if Some(to) == en_passant {
                moves.push(Move::new(
                    from,
                    to,
                    pawn,
                    Some(PieceKind::Pawn),
                    None,
                    MoveFlags::EN_PASSANT,
                ));
                continue;
            }
            let captured = captured_at(board, player, to);
            if to.rank() == Rank::promotion(player) {
                for promotion in Promotion::iter() {
                    moves.push(Move::new(
                        from,
                        to,
                        pawn,
                        captured,
                        Some(promotion),
                        MoveFlags::empty(),
                    ));
                }
                continue;
            }
            let flags = if Some(to) == double_push {
                MoveFlags::DOUBLE_PAWN_PUSH
            } else {
                MoveFlags::empty()
            };
            moves.push(Move::new(from, to, pawn, captured, None, flags));
        }
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn uci(moves: &MoveList) -> Vec<String> {
        moves.iter().map(ToString::to_string).sorted().collect()
    }

    #[test]
    fn starting_position() {
        let position = Position::starting();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 20);
        assert_eq!(
            moves.iter().filter(|mv| mv.piece().kind == PieceKind::Knight).count(),
            4
        );
        assert_eq!(
            moves
                .iter()
                .filter(|mv| mv.flags().contains(MoveFlags::DOUBLE_PAWN_PUSH))
                .count(),
            8
        );
        // Knights come before pawns.
        assert_eq!(moves[0].to_string(), "b1a3");
        assert_eq!(moves.last().map(ToString::to_string), Some("h2h4".to_string()));
    }

    #[test]
    fn per_piece_generators() {
        let position =
            Position::try_from("4k3/8/8/8/3Q4/8/8/4K2R w K - 0 1").unwrap();
        let mut queen = MoveList::new();
        generate(&position, Player::White, PieceKind::Queen, &mut queen);
        assert_eq!(queen.len(), 27);
        let mut king = MoveList::new();
        generate(&position, Player::White, PieceKind::King, &mut king);
        assert_eq!(
            uci(&king),
            vec!["e1d1", "e1d2", "e1e2", "e1f1", "e1f2", "e1g1"]
        );
        assert!(king.iter().any(Move::is_castle));
        let mut black_king = MoveList::new();
        generate(&position, Player::Black, PieceKind::King, &mut black_king);
        assert_eq!(black_king.len(), 5);
    }

    #[test]
    fn castling_through_attacked_square() {
        // The rook on f8 attacks f1, short castle is not allowed. Long castle
        // is fine: only b1 is attacked and the king does not pass it.
        let position =
            Position::try_from("1r3rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = uci(&legal_moves(&position));
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));
    }

    #[test]
    fn castling_blocked_or_in_check() {
        let blocked = Position::try_from("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        assert!(!legal_moves(&blocked).iter().any(Move::is_castle));
        let in_check = Position::try_from("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        assert!(!legal_moves(&in_check).iter().any(Move::is_castle));
        let no_rights = Position::try_from("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(!legal_moves(&no_rights).iter().any(Move::is_castle));
        let black = Position::try_from("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1").unwrap();
        assert_eq!(legal_moves(&black).iter().filter(|mv| mv.is_castle()).count(), 2);
    }

    #[test]
    fn pinned_piece() {
        // The knight on e2 is pinned by the rook on e8.
        let position = Position::try_from("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&position)
            .iter()
            .all(|mv| mv.piece().kind == PieceKind::King));
    }

    #[test]
    fn en_passant_only_onto_target() {
        let position =
            Position::try_from("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let moves = legal_moves(&position);
        let en_passant: Vec<_> = moves.iter().filter(|mv| mv.is_en_passant()).collect();
        assert_eq!(en_passant.len(), 1);
        assert_eq!(en_passant[0].to_string(), "e5d6");
        assert_eq!(en_passant[0].captured(), Some(PieceKind::Pawn));

        let without_target = Position::try_from("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").unwrap();
        assert!(!legal_moves(&without_target).iter().any(Move::is_en_passant));
    }

    #[test]
    fn en_passant_discovering_check() {
        // Capturing en passant would remove both pawns from the fifth rank and
        // expose the king to the rook.
        let position = Position::try_from("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").unwrap();
        assert!(!legal_moves(&position).iter().any(Move::is_en_passant));
    }

    #[test]
    fn promotions() {
        let position = Position::try_from("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&position);
        let promotions: Vec<_> = moves
            .iter()
            .filter(|mv| mv.promotion().is_some())
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            promotions,
            vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
        assert!(moves
            .iter()
            .filter(|mv| mv.to() == Square::B8)
            .all(|mv| mv.captured() == Some(PieceKind::Rook)));
    }

    #[test]
    fn blocked_pawns() {
        let position = Position::try_from("4k3/8/8/8/8/p7/P7/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&position)
            .iter()
            .all(|mv| mv.piece().kind != PieceKind::Pawn));
        let double_blocked = Position::try_from("4k3/8/8/8/p7/8/P7/4K3 w - - 0 1").unwrap();
        assert_eq!(
            legal_moves(&double_blocked)
                .iter()
                .filter(|mv| mv.piece().kind == PieceKind::Pawn)
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["a2a3"]
        );
    }

    #[test]
    fn checkmate_has_no_moves() {
        let position =
            Position::try_from("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(legal_moves(&position).is_empty());
    }
}
