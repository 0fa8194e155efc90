use bitmate::chess::position::Position;
use bitmate::evaluation::{evaluate, Score};
use bitmate::search::minimax::{search_best_move, Searcher};
use bitmate::search::{go, Limits};
use pretty_assertions::assert_eq;

fn setup(input: &str) -> Position {
    match Position::try_from(input) {
        Ok(position) => position,
        Err(error) => panic!("parsing legal position {input}: {error:#}"),
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn depth_zero() {
    init_logging();
    let position = Position::starting();
    let result = go(&position, Limits::depth(0));
    assert_eq!(result.score, evaluate(&position));
    assert_eq!(result.best_move, None);
}

#[test]
fn alpha_beta_depth_zero_is_evaluation() {
    let position = setup("r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9");
    let mut searcher = Searcher::new(&position);
    let score = searcher.alpha_beta(0, -Score::INFINITY, Score::INFINITY, true);
    assert_eq!(score, evaluate(&position));
    assert_eq!(searcher.nodes(), 1);
    assert_eq!(position.history_len(), 0);
}

#[test]
fn starting_position_is_balanced() {
    init_logging();
    let result = go(&Position::starting(), Limits::depth(2));
    assert_eq!(result.score, Score::DRAW);
    // All moves are equal: the first generated one wins the tie.
    assert_eq!(
        result.best_move,
        Position::starting().legal_moves().first().copied()
    );
    // Root, the first reply with its 20 leaves, then every other reply is cut
    // off after its first leaf.
    assert_eq!(result.nodes, 1 + 21 + 19 * 2);
}

#[test]
fn black_minimizes() {
    init_logging();
    // One ply deep the recapture on d2 is beyond the horizon.
    let position = setup("4k3/8/8/3r4/8/8/3R4/4K3 b - - 0 1");
    let result = go(&position, Limits::depth(1));
    assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("d5d2".into()));
    assert_eq!(result.score, Score::cp(-500));
}

#[test]
fn prefers_faster_mate() {
    init_logging();
    // Qg7 mates at once, Qh7+ only checks and there are slower mates too.
    let position = setup("6k1/8/6KQ/8/8/8/8/8 w - - 0 1");
    let result = go(&position, Limits::depth(3));
    assert_eq!(result.score, Score::mate(1));
    assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("h6g7".into()));
    let mut after = position.clone();
    after.make_moves_unchecked(result.best_move);
    assert!(after.is_checkmate());
}

#[test]
fn black_mates() {
    init_logging();
    // Fool's mate, Black to move.
    let mut position = Position::starting();
    for notation in ["f3", "e5", "g4"] {
        let _ = position.apply_san(notation).unwrap();
    }
    let result = go(&position, Limits::depth(2));
    assert_eq!(result.best_move.map(|mv| mv.to_string()), Some("d8h4".into()));
    assert_eq!(result.score, -Score::mate(1));
    assert_eq!(result.score.to_string(), "mate -1");
}

#[test]
fn search_leaves_position_alone() {
    let mut position = Position::starting();
    let _ = position.apply_san("e4").unwrap();
    let before = position.clone();
    let mut searcher = Searcher::new(&position);
    let result = searcher.best_move(2, false);
    assert_eq!(searcher.nodes(), result.nodes);
    assert_eq!(position, before);
    assert_eq!(position.history_len(), 1);
    assert_eq!(position.to_string(), before.to_string());
}

#[test]
fn deeper_search_is_consistent() {
    let position = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let first = search_best_move(&position, 3, true);
    let second = search_best_move(&position, 3, true);
    assert_eq!(first, second);
    assert!(first.best_move.is_some());
}
