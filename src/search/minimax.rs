//! Implementation of [Minimax] algorithm with [Alpha-Beta pruning].
//!
//! The score is always White-relative, so the maximizing player is White in
//! the usual setup. The search walks the tree on its own copy of the position,
//! applying and undoing moves in place.
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax
//! [Alpha-Beta pruning]: https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning

use crate::chess::core::Player;
use crate::chess::position::Position;
use crate::evaluation::{evaluate, Score};
use crate::search::{Depth, SearchResult};

/// Walks the game tree of a single root position.
pub struct Searcher {
    position: Position,
    root_history: usize,
    nodes: u64,
}

impl Searcher {
    /// Takes a private copy of `root`: nothing the search does is observable
    /// from the outside.
    #[must_use]
    pub fn new(root: &Position) -> Self {
        Self {
            position: root.clone(),
            root_history: root.history_len(),
            nodes: 0,
        }
    }

    /// Number of positions visited so far.
    #[must_use]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    fn ply(&self) -> u8 {
        u8::try_from(self.position.history_len() - self.root_history).unwrap_or(u8::MAX)
    }

    /// Evaluates the current position `depth` plies deep within the `(alpha,
    /// beta)` window.
    ///
    /// A side without legal moves is either checkmated (a mate score against
    /// it, larger for mates closer to the root) or stalemated
    /// ([`Score::DRAW`]).
    pub fn alpha_beta(
        &mut self,
        depth: Depth,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.nodes += 1;
        if depth == 0 {
            return evaluate(&self.position);
        }
        let moves = self.position.legal_moves();
        if moves.is_empty() {
            return self.terminal_score();
        }
        let mut best = if maximizing {
            -Score::INFINITY
        } else {
            Score::INFINITY
        };
        for next in &moves {
            self.position.make_moves_unchecked([*next]);
            let value = self.alpha_beta(depth - 1, alpha, beta, !maximizing);
            let undone = self.position.undo_last_move();
            debug_assert_eq!(undone.as_ref(), Ok(next));
            if maximizing {
                best = best.max(value);
                if best >= beta {
                    break;
                }
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                if best <= alpha {
                    break;
                }
                beta = beta.min(best);
            }
        }
        best
    }

    /// Picks the best root move for the maximizing (or minimizing) side. The
    /// first move reaching the best score wins ties.
    pub fn best_move(&mut self, depth: Depth, maximizing: bool) -> SearchResult {
        self.nodes += 1;
        let mut result = SearchResult {
            score: evaluate(&self.position),
            best_move: None,
            nodes: 0,
        };
        if depth > 0 {
            let moves = self.position.legal_moves();
            if moves.is_empty() {
                result.score = self.terminal_score();
            }
            let mut alpha = -Score::INFINITY;
            let mut beta = Score::INFINITY;
            for next in &moves {
                self.position.make_moves_unchecked([*next]);
                let value = self.alpha_beta(depth - 1, alpha, beta, !maximizing);
                let undone = self.position.undo_last_move();
                debug_assert_eq!(undone.as_ref(), Ok(next));
                let improves = match result.best_move {
                    None => true,
                    Some(_) if maximizing => value > result.score,
                    Some(_) => value < result.score,
                };
                if improves {
                    result.score = value;
                    result.best_move = Some(*next);
                    if maximizing {
                        alpha = value;
                    } else {
                        beta = value;
                    }
                }
            }
        }
        result.nodes = self.nodes;
        result
    }

    fn terminal_score(&self) -> Score {
        if !self.position.is_check() {
            return Score::DRAW;
        }
        let mate = Score::mate(self.ply());
        match self.position.side_to_move() {
            Player::White => -mate,
            Player::Black => mate,
        }
    }
}

/// Runs a fresh [`Searcher`] on `position`.
#[must_use]
pub fn search_best_move(position: &Position, depth: Depth, maximizing: bool) -> SearchResult {
    let mut searcher = Searcher::new(position);
    let result = searcher.best_move(depth, maximizing);
    tracing::debug!(
        depth,
        nodes = result.nodes,
        score = %result.score,
        best_move = ?result.best_move.map(|mv| mv.to_string()),
        "search finished"
    );
    result
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Plain minimax without pruning, the reference for the pruned search.
    fn minimax(position: &mut Position, depth: Depth, ply: u8, maximizing: bool) -> Score {
        if depth == 0 {
            return evaluate(position);
        }
        let moves = position.legal_moves();
        if moves.is_empty() {
            if !position.is_check() {
                return Score::DRAW;
            }
            return match position.side_to_move() {
                Player::White => -Score::mate(ply),
                Player::Black => Score::mate(ply),
            };
        }
        let values = moves.iter().map(|next| {
            position.make_moves_unchecked([*next]);
            let value = minimax(position, depth - 1, ply + 1, !maximizing);
            let _ = position.undo_last_move();
            value
        });
        let values: Vec<Score> = values.collect();
        if maximizing {
            values.into_iter().max().unwrap()
        } else {
            values.into_iter().min().unwrap()
        }
    }

    #[test]
    fn depth_zero_is_evaluation() {
        let position = Position::try_from(
            "rnb1kbnr/ppp2p1p/6p1/3pN1B1/3P4/2N5/PPP1PPPP/R2QKB1R b KQkq - 0 5",
        )
        .unwrap();
        let result = search_best_move(&position, 0, false);
        assert_eq!(result.score, evaluate(&position));
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn alpha_beta_at_depth_zero() {
        let position = Position::try_from(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for maximizing in [true, false] {
            let mut searcher = Searcher::new(&position);
            let score = searcher.alpha_beta(0, -Score::mate(0), Score::mate(0), maximizing);
            assert_eq!(score, evaluate(&position));
            assert_eq!(searcher.nodes(), 1);
        }
        // A narrow window does not clamp the static evaluation.
        let mut searcher = Searcher::new(&position);
        assert_eq!(
            searcher.alpha_beta(0, Score::cp(5000), Score::cp(5001), true),
            evaluate(&position)
        );
    }

    #[test]
    fn takes_free_queen() {
        let position = Position::try_from("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let result = search_best_move(&position, 1, true);
        assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("d1d5".into()));
        assert_eq!(result.score, Score::cp(500));
        // Root plus every child.
        assert_eq!(result.nodes, 1 + position.legal_moves().len() as u64);
    }

    #[test]
    fn finds_back_rank_mate() {
        let position = Position::try_from("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let result = search_best_move(&position, 3, true);
        assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("a1a8".into()));
        assert_eq!(result.score, Score::mate(1));
    }

    #[test]
    fn mate_and_stalemate_differ() {
        // Black is checkmated.
        let mated = Position::try_from("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let result = search_best_move(&mated, 2, false);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, Score::mate(0));
        // Black is stalemated.
        let stalemated = Position::try_from("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        let result = search_best_move(&stalemated, 2, false);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, Score::DRAW);
    }

    #[test]
    fn pruning_keeps_minimax_score() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        ] {
            let mut position = Position::try_from(fen).unwrap();
            let maximizing = position.side_to_move() == Player::White;
            let result = search_best_move(&position, 2, maximizing);
            assert_eq!(result.score, minimax(&mut position, 2, 0, maximizing), "{fen}");
            assert!(result.best_move.is_some());
        }
    }

    #[test]
    fn search_does_not_modify_position() {
        let position = Position::starting();
        let before = position.to_string();
        let _ = search_best_move(&position, 2, true);
        assert_eq!(position.to_string(), before);
        assert_eq!(position.history_len(), 0);
    }
}
