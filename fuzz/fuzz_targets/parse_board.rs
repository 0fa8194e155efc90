#![no_main]
use bitmate::chess::position::Position;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = Position::try_from(s) {
            // Printing the position back yields the same position.
            let printed = position.to_string();
            let reparsed = Position::from_fen(&printed).expect("printed FEN is valid");
            assert_eq!(reparsed.to_string(), printed);
            assert_eq!(reparsed, position);
        }
    }
});
