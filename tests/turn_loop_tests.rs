//! Turn loop integration tests
//!
//! Drives [`TurnLoop`] with in-process providers under paused tokio time, so
//! every delay is observable and nothing touches the network.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use shakmaty::Color;
use tokio::time::Instant;

use common::{GatedProvider, Harness, QueueProvider, ViewEvent};
use llmchess::game::ai::ScriptedProvider;
use llmchess::game::{Step, StopReason};

fn scripted_harness() -> Harness {
    Harness::new(
        ScriptedProvider::new("GPT-4", &[]),
        ScriptedProvider::new("Gemini-AI", &[]),
    )
}

// ============================================================================
// Remote-provider loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_successful_move_schedules_next_turn() {
    //! One cycle plays the move, saves it and waits one second
    let h = Harness::new(
        QueueProvider::new("Llama 3.3", vec![Ok("e4")]),
        QueueProvider::new("Gemini", vec![]),
    );
    let mut turn_loop = h.start();

    assert_eq!(turn_loop.advance().await, Step::Next(Duration::from_secs(1)));

    let session = h.session.lock();
    assert_eq!(session.game().pgn(), "1. e4");
    assert_eq!(session.game().turn(), Color::Black);
    drop(session);

    assert_eq!(h.store.load().map(|s| s.pgn), Some(String::from("1. e4")));
    assert_eq!(
        h.view.events(),
        vec![
            ViewEvent::Thinking(String::from("Llama 3.3"), Color::White),
            ViewEvent::Frame(String::from("Black (Gemini) to move.")),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_server_error_retries_after_two_seconds() {
    //! A 500 from the provider leaves the game untouched
    let h = Harness::new(
        QueueProvider::new("Llama 3.3", vec![Err(500), Ok("d4")]),
        QueueProvider::new("Gemini", vec![]),
    );
    let mut turn_loop = h.start();

    assert_eq!(turn_loop.advance().await, Step::Retry(Duration::from_secs(2)));
    {
        let session = h.session.lock();
        assert_eq!(session.game().ply(), 0);
        assert!(session.is_running());
    }
    assert_eq!(h.store.load(), None);

    assert_eq!(turn_loop.advance().await, Step::Next(Duration::from_secs(1)));
    assert_eq!(h.session.lock().game().pgn(), "1. d4");
}

#[tokio::test(start_paused = true)]
async fn test_unresolvable_reply_is_retried() {
    //! Ke2 is illegal from the start position; it counts as a failure
    let white = QueueProvider::new("Llama 3.3", vec![Ok("Ke2"), Ok("Best move is unclear")]);
    let calls = white.calls();
    let h = Harness::new(white, QueueProvider::new("Gemini", vec![]));
    let mut turn_loop = h.start();

    assert!(matches!(turn_loop.advance().await, Step::Retry(_)));
    assert!(matches!(turn_loop.advance().await, Step::Retry(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.session.lock().game().ply(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_plays_until_checkmate() {
    //! Fool's mate with one failed request along the way
    let h = Harness::new(
        QueueProvider::new("Llama 3.3", vec![Err(503), Ok("f3"), Ok("g4")]),
        QueueProvider::new("Gemini", vec![Ok("e5"), Ok("Qh4")]),
    );
    let turn_loop = h.start();

    let started = Instant::now();
    let reason = turn_loop.run().await;
    let elapsed = started.elapsed();

    assert_eq!(reason, StopReason::GameOver);
    // 2 s retry, then 1 s after each of the three non-final moves
    assert!(elapsed >= Duration::from_secs(5), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(6), "elapsed {:?}", elapsed);

    let session = h.session.lock();
    assert!(session.game().is_checkmate());
    assert!(!session.is_running());
    assert_eq!(session.game().pgn(), "1. f3 e5 2. g4 Qh4#");
    drop(session);

    let events = h.view.events();
    assert!(events.contains(&ViewEvent::Frame(String::from(
        "Game Over: Black (Gemini) wins by Checkmate."
    ))));
    assert_eq!(events.last(), Some(&ViewEvent::HideThinking));
    assert_eq!(
        h.store.load().map(|s| s.pgn),
        Some(String::from("1. f3 e5 2. g4 Qh4#"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_stopped_session_does_not_request() {
    let white = QueueProvider::new("Llama 3.3", vec![Ok("e4")]);
    let calls = white.calls();
    let h = Harness::new(white, QueueProvider::new("Gemini", vec![]));
    let mut turn_loop = h.start();
    h.session.lock().stop();

    assert_eq!(
        turn_loop.advance().await,
        Step::Stopped(StopReason::NotRunning)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.view.events(), vec![ViewEvent::HideThinking]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_request_discards_reply() {
    //! The reply arrives after a reset and must not land on the new board
    let white = GatedProvider::new("Llama 3.3", "e4");
    let gate = white.gate.clone();
    let h = Harness::new(white, QueueProvider::new("Gemini", vec![]));
    let mut turn_loop = h.start();

    let view = h.view.clone();
    let task = tokio::spawn(async move { turn_loop.advance().await });
    while !view
        .events()
        .iter()
        .any(|e| matches!(e, ViewEvent::Thinking(..)))
    {
        tokio::task::yield_now().await;
    }

    h.session.lock().reset();
    gate.notify_one();

    assert_eq!(task.await.unwrap(), Step::Stopped(StopReason::Stale));
    assert_eq!(h.session.lock().game().ply(), 0);
    assert_eq!(h.store.load(), None);
}

#[tokio::test(start_paused = true)]
async fn test_restart_makes_old_loop_stale() {
    let h = Harness::new(
        QueueProvider::new("Llama 3.3", vec![Ok("e4"), Ok("c4")]),
        QueueProvider::new("Gemini", vec![]),
    );
    let mut old_loop = h.start();
    let mut new_loop = h.start();
    assert_ne!(old_loop.generation(), new_loop.generation());

    assert_eq!(old_loop.advance().await, Step::Stopped(StopReason::Stale));
    assert!(matches!(new_loop.advance().await, Step::Next(_)));
    assert_eq!(h.session.lock().game().pgn(), "1. e4");
}

#[tokio::test(start_paused = true)]
async fn test_scripted_side_invalid_move_is_fatal() {
    //! A fixed list repeats its bad move forever, so the game stops instead
    let h = Harness::new(
        ScriptedProvider::new("Byrne", &["Ke2"]),
        QueueProvider::new("Gemini", vec![]),
    );
    let mut turn_loop = h.start();

    assert_eq!(
        turn_loop.advance().await,
        Step::Stopped(StopReason::ScriptFailed)
    );
    assert!(!h.session.lock().is_running());
    assert_eq!(h.view.errors(), vec![String::from("Error: Invalid move in script.")]);
    assert_eq!(h.store.load(), None);

    assert_eq!(
        turn_loop.advance().await,
        Step::Stopped(StopReason::NotRunning)
    );
}

#[tokio::test(start_paused = true)]
async fn test_scripted_side_running_out_ends_game() {
    let h = Harness::new(
        ScriptedProvider::new("Byrne", &["e4"]),
        QueueProvider::new("Gemini", vec![Ok("e5")]),
    );
    let turn_loop = h.start();

    assert_eq!(turn_loop.run().await, StopReason::ScriptExhausted);
    assert!(!h.session.lock().is_running());
    assert_eq!(
        h.view.banners(),
        vec![String::from("Replay finished without a result.")]
    );
    assert_eq!(h.store.load().map(|s| s.pgn), Some(String::from("1. e4 e5")));
}

// ============================================================================
// Scripted replay
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_replay_ends_in_checkmate() {
    //! Byrne vs Fischer: 82 plies, each after 1-5 s of simulated thinking
    let h = scripted_harness();
    let turn_loop = h.start();

    let started = Instant::now();
    let reason = turn_loop
        .run_scripted(ScriptedProvider::byrne_fischer("script"))
        .await;
    let elapsed = started.elapsed();

    assert_eq!(reason, StopReason::GameOver);
    assert!(elapsed >= Duration::from_secs(82));
    assert!(elapsed <= Duration::from_secs(82 * 5));

    let session = h.session.lock();
    assert!(session.game().is_checkmate());
    assert_eq!(session.script_cursor(), 82);
    assert!(session.game().pgn().ends_with("41. Kc1 Rc2#"));
    drop(session);

    assert_eq!(h.view.banners(), vec![String::from("Gemini-AI wins by Checkmate!")]);
    assert_eq!(h.store.load(), None, "replay must not touch the store");
}

#[tokio::test(start_paused = true)]
async fn test_invalid_scripted_move_is_fatal() {
    //! Ke7 is blocked by Black's own pawn
    let h = scripted_harness();
    let turn_loop = h.start();

    let reason = turn_loop
        .run_scripted(ScriptedProvider::new("script", &["e4", "Ke7", "Nf3"]))
        .await;

    assert_eq!(reason, StopReason::ScriptFailed);
    assert_eq!(h.view.errors(), vec![String::from("Error: Invalid move in script.")]);
    let session = h.session.lock();
    assert_eq!(session.game().pgn(), "1. e4");
    assert_eq!(session.script_cursor(), 1);
    assert!(!session.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_script_reports_no_result() {
    let h = scripted_harness();
    let turn_loop = h.start();

    let reason = turn_loop
        .run_scripted(ScriptedProvider::new("script", &["e4", "e5", "Nf3"]))
        .await;

    assert_eq!(reason, StopReason::ScriptExhausted);
    assert_eq!(
        h.view.banners(),
        vec![String::from("Replay finished without a result.")]
    );
    let session = h.session.lock();
    assert_eq!(session.game().ply(), 3);
    assert!(!session.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_cursor_out_of_step_with_board_fails_fast() {
    //! The board has Black to move but the cursor points at a White move
    let h = scripted_harness();
    let mut turn_loop = h.start();
    h.session.lock().apply("e4").unwrap();

    let script = ScriptedProvider::new("script", &["d4", "d5"]);
    assert_eq!(
        turn_loop.advance_scripted(&script).await,
        Step::Stopped(StopReason::ScriptFailed)
    );
    assert_eq!(h.session.lock().game().pgn(), "1. e4");
}

#[tokio::test(start_paused = true)]
async fn test_scripted_thinking_names_side_from_board() {
    let h = scripted_harness();
    let mut turn_loop = h.start();
    let script = ScriptedProvider::new("script", &["e4", "e5"]);

    assert_eq!(
        turn_loop.advance_scripted(&script).await,
        Step::Next(Duration::ZERO)
    );
    assert_eq!(
        turn_loop.advance_scripted(&script).await,
        Step::Next(Duration::ZERO)
    );

    let thinking: Vec<ViewEvent> = h
        .view
        .events()
        .into_iter()
        .filter(|e| matches!(e, ViewEvent::Thinking(..)))
        .collect();
    assert_eq!(
        thinking,
        vec![
            ViewEvent::Thinking(String::from("GPT-4"), Color::White),
            ViewEvent::Thinking(String::from("Gemini-AI"), Color::Black),
        ]
    );
}
