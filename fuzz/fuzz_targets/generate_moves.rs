#![no_main]
use bitmate::chess::position;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(input) => input,
        Err(_) => return,
    };
    let mut position = match position::Position::from_fen(input) {
        Ok(position) => position,
        Err(_) => return,
    };
    let shakmaty_setup: shakmaty::fen::Fen = match input.parse() {
        Ok(setup) => setup,
        Err(_) => return,
    };
    let shakmaty_position: Result<Chess, _> = shakmaty_setup.into_position(CastlingMode::Standard);
    let Ok(shakmaty_position) = shakmaty_position else {
        return;
    };
    let moves = position.legal_moves();
    assert_eq!(
        moves.iter().map(|m| m.to_string()).sorted().collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
    // Every move can be taken back without a trace.
    let before = position.to_string();
    for next in moves {
        position.make_moves_unchecked([next]);
        assert_eq!(position.undo_last_move(), Ok(next));
        assert_eq!(position.to_string(), before);
    }
});
