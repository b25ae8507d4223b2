//! Chess game module - rules, session state, move providers and the turn loop
//!
//! Everything that decides what happens on the board lives here; drawing and
//! input live in `rendering` and `ui`.
//!
//! # Module Organization
//!
//! - `rules` - [`ChessGame`], a thin wrapper over `shakmaty` with sloppy move
//!   parsing, PGN import/export and draw detection
//! - `resources` - captured-piece log and game-over classification
//! - `session` - [`GameSession`]: the game plus running flag, generation and
//!   script cursor, shared as [`SharedSession`]
//! - `ai` - [`MoveProvider`](ai::MoveProvider) implementations (Gemini, chat
//!   completions, scripted)
//! - `turn_loop` - [`TurnLoop`], one async task per game
//! - `error` - [`GameError`]
//!
//! # Data Flow
//!
//! 1. The turn loop snapshots the session into a `MoveRequest`
//! 2. The provider for the side to move returns move text
//! 3. `ChessGame::apply_sloppy` resolves it to one legal move
//! 4. The captured log is updated, the view redrawn, the session saved

pub mod ai;
pub mod error;
pub mod resources;
pub mod rules;
pub mod session;
pub mod turn_loop;

pub use error::{GameError, GameResult};
pub use rules::{ChessGame, MoveRecord};
pub use session::{GameSession, SharedSession};
pub use turn_loop::{Step, StopReason, TurnError, TurnLoop};
