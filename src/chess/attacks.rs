//! Mappings of squares to the attacked squares for each piece. The tables are
//! computed once per process and shared read-only afterwards, so concurrent
//! readers need no synchronization once [`LookupTables::get`] has returned.
//!
//! Sliding pieces use the [Classical Approach] ray scan: for each
//! direction the full ray from the origin is looked up, the nearest blocker on
//! it is found with a bit scan and everything behind the blocker is cut off.
//! The blocker itself stays in the attack set.
//!
//! [Classical Approach]: https://www.chessprogramming.org/Classical_Approach

use std::sync::OnceLock;

use strum::IntoEnumIterator;

use crate::chess::bitboard::Bitboard;
use crate::chess::bits::BOARD_WIDTH;
use crate::chess::core::{Direction, File, Player, Rank, Square, BOARD_SIZE};

const SQUARES: usize = BOARD_SIZE as usize;
const DIRECTIONS: usize = 8;

/// (file, rank) jumps of a knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

static TABLES: OnceLock<LookupTables> = OnceLock::new();

/// Pre-calculated masks and attack sets. Obtain the shared instance through
/// [`LookupTables::get`].
pub struct LookupTables {
    ranks: [Bitboard; BOARD_WIDTH as usize],
    files: [Bitboard; BOARD_WIDTH as usize],
    knight: [Bitboard; SQUARES],
    king: [Bitboard; SQUARES],
    pawn: [[Bitboard; SQUARES]; 2],
    rays: [[Bitboard; SQUARES]; DIRECTIONS],
}

impl LookupTables {
    /// Returns the process-wide tables, building them on first use.
    pub fn get() -> &'static Self {
        TABLES.get_or_init(|| {
            let tables = Self::build();
            tracing::debug!("lookup tables initialized");
            tables
        })
    }

    fn build() -> Self {
        let mut tables = Self {
            ranks: [Bitboard::empty(); BOARD_WIDTH as usize],
            files: [Bitboard::empty(); BOARD_WIDTH as usize],
            knight: [Bitboard::empty(); SQUARES],
            king: [Bitboard::empty(); SQUARES],
            pawn: [[Bitboard::empty(); SQUARES]; 2],
            rays: [[Bitboard::empty(); SQUARES]; DIRECTIONS],
        };
        for square in Square::iter() {
            tables.ranks[square.rank() as usize].set(square);
            tables.files[square.file() as usize].set(square);

            for (file_delta, rank_delta) in KNIGHT_DELTAS {
                if let Some(target) = offset(square, file_delta, rank_delta) {
                    tables.knight[square.index()].set(target);
                }
            }

            for direction in Direction::iter() {
                if let Some(target) = square.shift(direction) {
                    tables.king[square.index()].set(target);
                }
                let mut ray = Bitboard::empty();
                let mut current = square.shift(direction);
                while let Some(target) = current {
                    ray.set(target);
                    current = target.shift(direction);
                }
                tables.rays[direction.index()][square.index()] = ray;
            }

            for player in Player::iter() {
                for side in [Direction::Left, Direction::Right] {
                    let (file_delta, _) = side.delta();
                    let (_, rank_delta) = player.push_direction().delta();
                    if let Some(target) = offset(square, file_delta, rank_delta) {
                        tables.pawn[player.index()][square.index()].set(target);
                    }
                }
            }
        }
        tables
    }

    /// Squares of the given rank.
    #[must_use]
    pub fn rank_mask(&self, rank: Rank) -> Bitboard {
        self.ranks[rank as usize]
    }

    /// Squares of the given file.
    #[must_use]
    pub fn file_mask(&self, file: File) -> Bitboard {
        self.files[file as usize]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king[square.index()]
    }

    /// Squares a pawn of `player` standing on `square` captures on. Pushes are
    /// not included.
    #[must_use]
    pub fn pawn_attacks(&self, player: Player, square: Square) -> Bitboard {
        self.pawn[player.index()][square.index()]
    }

    /// Full ray from `square` to the board edge, excluding the origin.
    #[must_use]
    pub fn ray(&self, direction: Direction, square: Square) -> Bitboard {
        self.rays[direction.index()][square.index()]
    }

    /// Squares reachable along one ray: up to and including the first occupied
    /// square.
    #[must_use]
    pub fn ray_attacks(
        &self,
        direction: Direction,
        square: Square,
        occupancy: Bitboard,
    ) -> Bitboard {
        let ray = self.ray(direction, square);
        let blockers = ray & occupancy;
        let nearest = if direction.is_positive() {
            blockers.first()
        } else {
            blockers.last()
        };
        match nearest {
            Some(blocker) => ray ^ self.ray(direction, blocker),
            None => ray,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn rook_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        Direction::ORTHOGONAL
            .iter()
            .fold(Bitboard::empty(), |attacks, direction| {
                attacks | self.ray_attacks(*direction, square, occupancy)
            })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn bishop_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        Direction::DIAGONAL
            .iter()
            .fold(Bitboard::empty(), |attacks, direction| {
                attacks | self.ray_attacks(*direction, square, occupancy)
            })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn queen_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupancy) | self.bishop_attacks(square, occupancy)
    }
}

fn offset(square: Square, file_delta: i8, rank_delta: i8) -> Option<Square> {
    let file = square.file() as i8 + file_delta;
    let rank = square.rank() as i8 + rank_delta;
    let file = File::try_from(u8::try_from(file).ok()?).ok()?;
    let rank = Rank::try_from(u8::try_from(rank).ok()?).ok()?;
    Some(Square::new(file, rank))
}
