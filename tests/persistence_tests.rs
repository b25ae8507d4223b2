//! Save/restore round-trip tests
//!
//! After every successful move the persisted session, read back and resumed,
//! must reproduce the same position, history and captured pieces.

use llmchess::core::GameStore;
use llmchess::game::ai::SCRIPTED_MOVES;
use llmchess::game::GameSession;

fn assert_round_trip(moves: &[&str]) {
    let store = GameStore::in_memory();
    let mut session = GameSession::new();
    session.start();

    for mv in moves {
        session.apply(mv).unwrap();
        store.save(&session.to_persisted());

        let saved = store.load().expect("a saved session after a move");
        let mut restored = GameSession::new();
        restored.resume(&saved).unwrap();

        assert_eq!(restored.game().fen(), session.game().fen(), "after {}", mv);
        assert_eq!(restored.game().history(), session.game().history());
        assert_eq!(restored.captured(), session.captured());
    }
}

#[test]
fn test_round_trip_through_historical_game() {
    //! Castling, captures, checks and the final mate all survive
    assert_round_trip(SCRIPTED_MOVES);
}

#[test]
fn test_round_trip_with_sloppy_input() {
    //! Moves applied from loose text are saved in canonical SAN
    assert_round_trip(&["e2e4", "c7c5", "g1f3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"]);
}

#[test]
fn test_round_trip_with_promotion() {
    assert_round_trip(&[
        "a4", "h5", "a5", "h4", "a6", "h3", "axb7", "hxg2", "bxa8=Q", "gxh1=N",
    ]);
}

#[test]
fn test_clear_then_load_is_empty() {
    let store = GameStore::in_memory();
    let mut session = GameSession::new();
    session.start();
    session.apply("e4").unwrap();
    store.save(&session.to_persisted());

    store.clear();
    assert_eq!(store.load(), None);
}
