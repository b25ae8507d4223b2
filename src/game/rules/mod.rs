//! Chess rules module - thin wrapper over the `shakmaty` rules library
//!
//! [`ChessGame`] is the only mutator of the position during a session. It keeps
//! the SAN history next to the `shakmaty::Chess` position so PGN export,
//! repetition detection and restore-from-PGN all come from the same place.
//!
//! # Module Structure
//!
//! - `notation` - permissive ("sloppy") move text resolution
//! - `pgn` - movetext formatting and token extraction
//!
//! # Draw Conditions
//!
//! A game is drawn on stalemate, insufficient material, the fifty-move rule
//! (halfmove clock reaches 100) or threefold repetition.

pub mod notation;
pub mod pgn;

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{Board, Chess, Color, EnPassantMode, Position, Role};

use crate::game::error::{GameError, GameResult};

/// Halfmove clock value at which the fifty-move rule applies
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Result of applying one move
///
/// Produced by [`ChessGame::apply_sloppy`] and consumed right away by the
/// session to update captured pieces, the view and the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Side that made the move
    pub side: Color,
    /// SAN as written into the PGN (`Nxe4+`)
    pub san: String,
    /// Kind of piece taken, if any
    pub captured: Option<Role>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_draw: bool,
}

impl MoveRecord {
    /// True once no further move may be played
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate || self.is_draw
    }
}

/// Mutable game: current position plus the SAN history that produced it
#[derive(Debug, Clone)]
pub struct ChessGame {
    position: Chess,
    sans: Vec<String>,
    /// Placement/turn/castling/en-passant keys, one per position reached
    repetition_keys: Vec<String>,
}

impl Default for ChessGame {
    fn default() -> Self {
        let position = Chess::default();
        let key = repetition_key(&position);
        Self {
            position,
            sans: Vec::new(),
            repetition_keys: vec![key],
        }
    }
}

impl ChessGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a game by replaying the movetext of a PGN document
    ///
    /// Any token that does not resolve to a legal move makes the whole
    /// document invalid; nothing partial is returned.
    pub fn from_pgn(pgn: &str) -> GameResult<Self> {
        let mut game = Self::new();
        for (index, token) in pgn::movetext_tokens(pgn).into_iter().enumerate() {
            if let Err(e) = game.apply_sloppy(&token) {
                return Err(GameError::CorruptPgn {
                    index,
                    token,
                    reason: e.to_string(),
                });
            }
        }
        Ok(game)
    }

    /// Replace this game with the one described by `pgn`
    ///
    /// On error the current game is left untouched.
    pub fn load_pgn(&mut self, pgn: &str) -> GameResult<()> {
        *self = Self::from_pgn(pgn)?;
        Ok(())
    }

    /// Back to the initial position with an empty history
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply loosely written move text
    ///
    /// The text is resolved with [`notation::resolve`]; a move that cannot be
    /// resolved to exactly one legal move leaves the game unchanged.
    pub fn apply_sloppy(&mut self, text: &str) -> GameResult<MoveRecord> {
        let m = notation::resolve(&self.position, text)?;
        let side = self.position.turn();
        let captured = m.capture();

        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, m).to_string();
        self.sans.push(san.clone());
        self.repetition_keys.push(repetition_key(&self.position));

        Ok(MoveRecord {
            side,
            san,
            captured,
            is_check: self.position.is_check(),
            is_checkmate: self.is_checkmate(),
            is_draw: self.is_draw(),
        })
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Number of half-moves played so far
    pub fn ply(&self) -> usize {
        self.sans.len()
    }

    pub fn history(&self) -> &[String] {
        &self.sans
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Plain numbered movetext, no tag pairs
    pub fn pgn(&self) -> String {
        pgn::format_movetext(&self.sans)
    }

    /// Legal moves for the side to move, in SAN with check suffixes
    pub fn legal_moves_san(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| SanPlus::from_move(self.position.clone(), *m).to_string())
            .collect()
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES
    }

    /// Current position has occurred at least three times
    pub fn is_threefold_repetition(&self) -> bool {
        match self.repetition_keys.last() {
            Some(current) => self.repetition_keys.iter().filter(|k| *k == current).count() >= 3,
            None => false,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }
}

/// First four FEN fields: placement, turn, castling rights, en passant square
fn repetition_key(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal)
        .to_string()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}
