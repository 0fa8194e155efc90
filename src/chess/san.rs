//! [Standard Algebraic Notation] (SAN): resolving human-readable moves against
//! a position and printing moves the way game records store them.
//!
//! Parsing is lenient: both `O-O` and `0-0` castling spellings are accepted,
//! the capture marker `x` is optional, promotions may be written as `e8=Q` or
//! `e8Q` and check, mate and annotation suffixes (`+`, `#`, `!`, `?`) are
//! ignored. The move is then looked up among the legal moves and must match
//! exactly one of them.
//!
//! [Standard Algebraic Notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Standard_Algebraic_Notation_.28SAN.29

use std::fmt::Write;

use crate::chess::core::{File, Move, PieceKind, Promotion, Rank, Square};
use crate::chess::movegen::MoveList;
use crate::chess::position::Position;
use crate::error::{Error, Result};

/// Constraints a notation puts on the legal move it denotes.
#[derive(Debug, PartialEq, Eq)]
enum Pattern {
    Castle {
        long: bool,
    },
    Regular {
        kind: PieceKind,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        to: Square,
        promotion: Option<Promotion>,
    },
}

impl Pattern {
    fn parse(notation: &str) -> Option<Self> {
        let text = notation.trim().trim_end_matches(['+', '#', '!', '?']);
        match text {
            "O-O" | "0-0" => return Some(Self::Castle { long: false }),
            "O-O-O" | "0-0-0" => return Some(Self::Castle { long: true }),
            _ => (),
        }
        if !text.is_ascii() {
            return None;
        }
        let (kind, rest) = match text.as_bytes().first()? {
            b'K' => (PieceKind::King, &text[1..]),
            b'Q' => (PieceKind::Queen, &text[1..]),
            b'R' => (PieceKind::Rook, &text[1..]),
            b'B' => (PieceKind::Bishop, &text[1..]),
            b'N' => (PieceKind::Knight, &text[1..]),
            _ => (PieceKind::Pawn, text),
        };
        let (rest, promotion) = match rest.as_bytes().last()? {
            symbol @ (b'Q' | b'R' | b'B' | b'N') => {
                let rest = &rest[..rest.len() - 1];
                let promotion = Promotion::try_from(char::from(*symbol)).ok()?;
                (rest.strip_suffix('=').unwrap_or(rest), Some(promotion))
            },
            _ => (rest, None),
        };
        if rest.len() < 2 {
            return None;
        }
        let (prefix, destination) = rest.split_at(rest.len() - 2);
        let to = Square::try_from(destination).ok()?;
        let prefix = prefix.strip_suffix('x').unwrap_or(prefix);
        let mut from_file = None;
        let mut from_rank = None;
        for symbol in prefix.chars() {
            match symbol {
                'a'..='h' if from_file.is_none() && from_rank.is_none() => {
                    from_file = Some(File::try_from(symbol).ok()?);
                },
                '1'..='8' if from_rank.is_none() => {
                    from_rank = Some(Rank::try_from(symbol).ok()?);
                },
                _ => return None,
            }
        }
        Some(Self::Regular {
            kind,
            from_file,
            from_rank,
            to,
            promotion,
        })
    }

    fn matches(&self, mv: &Move) -> bool {
        match *self {
            Self::Castle { long } => mv.is_castle() && (mv.to().file() == File::C) == long,
            Self::Regular {
                kind,
                from_file,
                from_rank,
                to,
                promotion,
            } => {
                !mv.is_castle()
                    && mv.piece().kind == kind
                    && mv.to() == to
                    && mv.promotion() == promotion
                    && from_file.map_or(true, |file| mv.from().file() == file)
                    && from_rank.map_or(true, |rank| mv.from().rank() == rank)
            },
        }
    }
}

/// Finds the only legal move denoted by `notation`.
///
/// # Errors
///
/// [`Error::AmbiguousOrIllegalNotation`] when the notation can not be parsed
/// or matches zero or several legal moves.
pub fn resolve(position: &Position, notation: &str) -> Result<Move> {
    let candidates: MoveList = match Pattern::parse(notation) {
        Some(pattern) => position
            .legal_moves()
            .into_iter()
            .filter(|mv| pattern.matches(mv))
            .collect(),
        None => MoveList::new(),
    };
    match candidates.as_slice() {
        [only] => Ok(*only),
        _ => {
            tracing::debug!(notation, candidates = candidates.len(), "rejected notation");
            Err(Error::AmbiguousOrIllegalNotation {
                notation: notation.to_string(),
                candidates: candidates.len(),
            })
        },
    }
}

/// Prints a legal move of `position` in Standard Algebraic Notation, e.g.
/// `Nbd7`, `exd6`, `e8=Q+`, `O-O-O#`. The origin is only spelled out as much
/// as needed to tell the move apart from other legal moves.
#[must_use]
pub fn to_san(position: &Position, mv: &Move) -> String {
    let mut result = String::new();
    if mv.is_castle() {
        result.push_str(if mv.to().file() == File::G {
            "O-O"
        } else {
            "O-O-O"
        });
    } else {
        let kind = mv.piece().kind;
        match kind.san_symbol() {
            Some(symbol) => {
                result.push(symbol);
                disambiguate(position, mv, &mut result);
            },
            None => {
                if mv.is_capture() {
                    let _ = write!(result, "{}", mv.from().file());
                }
            },
        }
        if mv.is_capture() {
            result.push('x');
        }
        let _ = write!(result, "{}", mv.to());
        if let Some(symbol) = mv
            .promotion()
            .and_then(|promotion| PieceKind::from(promotion).san_symbol())
        {
            result.push('=');
            result.push(symbol);
        }
    }
    let mut after = position.clone();
    after.make_moves_unchecked([*mv]);
    if after.is_checkmate() {
        result.push('#');
    } else if after.is_check() {
        result.push('+');
    }
    result
}

fn disambiguate(position: &Position, mv: &Move, result: &mut String) {
    let rivals: MoveList = position
        .legal_moves()
        .into_iter()
        .filter(|other| {
            other.piece() == mv.piece() && other.to() == mv.to() && other.from() != mv.from()
        })
        .collect();
    if rivals.is_empty() {
        return;
    }
    let from = mv.from();
    if rivals.iter().all(|other| other.from().file() != from.file()) {
        let _ = write!(result, "{}", from.file());
    } else if rivals.iter().all(|other| other.from().rank() != from.rank()) {
        let _ = write!(result, "{}", from.rank());
    } else {
        let _ = write!(result, "{from}");
    }
}
