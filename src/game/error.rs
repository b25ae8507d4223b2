//! Error types for game module
//!
//! Provides custom error types for game logic including move resolution,
//! PGN reconstruction and scripted replay.

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Text did not resolve to exactly one legal move
    #[error("Invalid move '{text}': {reason}")]
    InvalidMove { text: String, reason: String },

    /// Stored or supplied PGN could not be replayed
    #[error("Corrupt PGN at token {index} ('{token}'): {reason}")]
    CorruptPgn {
        index: usize,
        token: String,
        reason: String,
    },

    /// A scripted move did not resolve against the current position
    #[error("Invalid move in script at index {index}: {text}")]
    InvalidScriptMove { index: usize, text: String },

    /// The script cursor and the rules engine disagree about the side to move
    #[error("Script cursor {index} is out of step with the side to move")]
    ScriptDesync { index: usize },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
