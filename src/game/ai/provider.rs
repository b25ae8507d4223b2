//! Move provider capability and the side-to-provider mapping
//!
//! A [`MoveProvider`] turns a [`MoveRequest`] snapshot into one move string.
//! The turn loop never knows which kind of provider it is talking to; it asks
//! [`Players::for_side`] for whoever plays the side to move.

use async_trait::async_trait;
use shakmaty::Color;

use crate::game::ai::error::ProviderResult;

/// Snapshot of the game handed to a provider
///
/// Taken under the session lock and then released, so providers never see
/// the live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Side to move
    pub side: Color,
    /// Plain movetext of the game so far
    pub pgn: String,
    pub fen: String,
    /// Legal moves for `side`, in SAN
    pub legal_moves: Vec<String>,
    /// Half-moves played so far; 0 means the first move of the game
    pub ply: usize,
}

impl MoveRequest {
    pub fn is_first_move(&self) -> bool {
        self.ply == 0
    }
}

/// Something that can choose a move
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Display name, used in status lines and logs
    fn name(&self) -> &str;

    /// Produce one move in (possibly sloppy) SAN
    async fn get_move(&self, request: &MoveRequest) -> ProviderResult<String>;

    /// True when moves come from a fixed list; a rejected move is final
    fn is_scripted(&self) -> bool {
        false
    }
}

/// Which provider plays which side
pub struct Players {
    white: Box<dyn MoveProvider>,
    black: Box<dyn MoveProvider>,
}

impl Players {
    pub fn new(white: Box<dyn MoveProvider>, black: Box<dyn MoveProvider>) -> Self {
        Self { white, black }
    }

    pub fn for_side(&self, side: Color) -> &dyn MoveProvider {
        match side {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn name_for(&self, side: Color) -> String {
        self.for_side(side).name().to_string()
    }
}

impl std::fmt::Debug for Players {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Players")
            .field("white", &self.white.name())
            .field("black", &self.black.name())
            .finish()
    }
}
