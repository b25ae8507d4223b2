//! Game session - everything one running game owns
//!
//! The session bundles the rules engine wrapper, the captured-piece log, the
//! `running` flag, the scripted-replay cursor and a `generation` counter.
//! Every start, resume or reset bumps the generation. A turn loop remembers the
//! generation it was started for; when an await completes it checks
//! [`GameSession::is_current`] before touching anything, so a reply that
//! arrives after a reset is dropped instead of landing in the new game.
//!
//! [`SharedSession`] is the handle the loop and the controls share. The lock is
//! only ever held for short synchronous sections, never across an `.await`.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::core::session_persistence::PersistedSession;
use crate::game::ai::MoveRequest;
use crate::game::error::GameResult;
use crate::game::resources::CapturedPieces;
use crate::game::rules::{ChessGame, MoveRecord};

/// One game plus the flags that drive its turn loop
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    game: ChessGame,
    captured: CapturedPieces,
    running: bool,
    generation: u64,
    script_cursor: usize,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the next scripted move to replay
    pub fn script_cursor(&self) -> usize {
        self.script_cursor
    }

    /// True while the loop started for `generation` may still act
    pub fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    /// Fresh game, running; returns the generation the new loop belongs to
    pub fn start(&mut self) -> u64 {
        self.reset();
        self.running = true;
        self.generation
    }

    /// Stop, clear the board and invalidate any loop still in flight
    pub fn reset(&mut self) {
        self.running = false;
        self.game.reset();
        self.captured.clear();
        self.script_cursor = 0;
        self.generation += 1;
    }

    /// Stop without touching the position
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Rebuild the game from a stored session and mark it running
    ///
    /// Replays the stored PGN first; if that fails the session is left as it
    /// was and the error is returned.
    pub fn resume(&mut self, stored: &PersistedSession) -> GameResult<u64> {
        let game = ChessGame::from_pgn(&stored.pgn)?;
        self.game = game;
        self.captured = CapturedPieces {
            white_captured: stored.white_captured.clone(),
            black_captured: stored.black_captured.clone(),
        };
        self.script_cursor = 0;
        self.running = true;
        self.generation += 1;
        Ok(self.generation)
    }

    /// Apply move text through the rules engine and log any capture
    ///
    /// A move that ends the game also clears the running flag.
    pub fn apply(&mut self, text: &str) -> GameResult<MoveRecord> {
        let record = self.game.apply_sloppy(text)?;
        self.captured.record(&record);
        if record.is_game_over() {
            self.running = false;
        }
        Ok(record)
    }

    pub fn advance_script_cursor(&mut self) {
        self.script_cursor += 1;
    }

    /// Snapshot handed to a move provider
    pub fn move_request(&self) -> MoveRequest {
        MoveRequest {
            side: self.game.turn(),
            pgn: self.game.pgn(),
            fen: self.game.fen(),
            legal_moves: self.game.legal_moves_san(),
            ply: self.game.ply(),
        }
    }

    /// What the store keeps for this session
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            pgn: self.game.pgn(),
            white_captured: self.captured.white_captured.clone(),
            black_captured: self.captured.black_captured.clone(),
        }
    }
}

/// Shared handle to the session
#[derive(Debug, Clone, Default)]
pub struct SharedSession(Arc<Mutex<GameSession>>);

impl SharedSession {
    pub fn new(session: GameSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.0.lock()
    }
}
