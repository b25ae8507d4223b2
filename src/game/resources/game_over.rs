//! Game over state tracking and result messages
//!
//! Classifies the position held by [`ChessGame`] into "still playing" or one
//! of the terminal results, and builds the status lines shown under the board.
//!
//! # Game Over Conditions
//!
//! ## Checkmate
//! - **WhiteWon**: Black is in check with no legal moves
//! - **BlackWon**: White is in check with no legal moves
//!
//! ## Draw Conditions
//! - **Stalemate**: Current player has no legal moves but is NOT in check
//! - **InsufficientMaterial**: Neither player can deliver checkmate (e.g., K vs K)
//! - **FiftyMoveRule**: 50 moves by each side without a capture or pawn move
//! - **ThreefoldRepetition**: Same position reached for the third time

use shakmaty::Color;

use crate::game::rules::ChessGame;

/// Terminal (or not) state of the current game
///
/// All non-Playing states are terminal: the turn loop stops as soon as it
/// sees one.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameOverState {
    /// Game is still in progress
    #[default]
    Playing,

    /// White won by checkmate
    WhiteWon,

    /// Black won by checkmate
    BlackWon,

    /// Draw by stalemate
    Stalemate,

    /// Draw by insufficient material
    InsufficientMaterial,

    /// Draw by the fifty-move rule
    FiftyMoveRule,

    /// Draw by threefold repetition
    ThreefoldRepetition,
}

impl GameOverState {
    /// Classify the current position of `game`
    pub fn from_game(game: &ChessGame) -> Self {
        if game.is_checkmate() {
            // The side to move is the one that got mated
            match game.turn() {
                Color::White => GameOverState::BlackWon,
                Color::Black => GameOverState::WhiteWon,
            }
        } else if game.is_stalemate() {
            GameOverState::Stalemate
        } else if game.is_insufficient_material() {
            GameOverState::InsufficientMaterial
        } else if game.is_fifty_move_draw() {
            GameOverState::FiftyMoveRule
        } else if game.is_threefold_repetition() {
            GameOverState::ThreefoldRepetition
        } else {
            GameOverState::Playing
        }
    }

    /// Check if the game has ended
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameOverState::Playing)
    }

    /// Human-readable description of the result
    ///
    /// Names the draw reason, which the status line leaves out.
    pub fn message(&self) -> &'static str {
        match self {
            GameOverState::Playing => "Game in progress",
            GameOverState::WhiteWon => "White wins by checkmate!",
            GameOverState::BlackWon => "Black wins by checkmate!",
            GameOverState::Stalemate => "Draw by stalemate",
            GameOverState::InsufficientMaterial => "Draw by insufficient material",
            GameOverState::FiftyMoveRule => "Draw by the fifty-move rule",
            GameOverState::ThreefoldRepetition => "Draw by threefold repetition",
        }
    }

    /// Get the winner of the game, if there is one
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOverState::WhiteWon => Some(Color::White),
            GameOverState::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameOverState::Stalemate
                | GameOverState::InsufficientMaterial
                | GameOverState::FiftyMoveRule
                | GameOverState::ThreefoldRepetition
        )
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameOverState::WhiteWon | GameOverState::BlackWon)
    }
}

/// "White (Llama 3.3)" style label for a side and the provider playing it
pub fn side_label(side: Color, player_name: &str) -> String {
    let side = match side {
        Color::White => "White",
        Color::Black => "Black",
    };
    format!("{} ({})", side, player_name)
}

/// Status line shown under the board
///
/// `names` yields the provider name playing each side.
pub fn status_line(game: &ChessGame, running: bool, names: impl Fn(Color) -> String) -> String {
    let state = GameOverState::from_game(game);
    match state.winner() {
        Some(winner) => format!(
            "Game Over: {} wins by Checkmate.",
            side_label(winner, &names(winner))
        ),
        None if state.is_draw() => String::from("Game Over: Draw."),
        None if running || game.ply() > 0 => {
            format!("{} to move.", side_label(game.turn(), &names(game.turn())))
        }
        None => String::from("Ready to Start"),
    }
}

/// Banner shown when a replay finishes
pub fn final_banner(game: &ChessGame, names: impl Fn(Color) -> String) -> String {
    let state = GameOverState::from_game(game);
    match state.winner() {
        Some(winner) => format!("{} wins by Checkmate!", names(winner)),
        None if state.is_draw() => String::from("Game is a Draw."),
        None => String::from("Replay finished without a result."),
    }
}
