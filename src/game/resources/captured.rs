//! Captured pieces tracking
//!
//! Keeps, per side, the glyphs of that side's pieces which have been taken, in
//! capture order. The lists are persisted verbatim with the session and
//! restored as-is, so they hold glyphs rather than roles.
//!
//! # Material Values
//!
//! Standard chess piece values in pawns:
//! - Pawn: 1
//! - Knight/Bishop: 3
//! - Rook: 5
//! - Queen: 9
//! - King: 0 (cannot be captured)
//!
//! # Material Advantage
//!
//! Positive advantage means White is ahead, negative means Black is ahead.
//! Example: If White took (Rook=5, Pawn=1) and Black took (Knight=3),
//! White's advantage is (5+1) - 3 = +3 pawns.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role};

use crate::game::rules::MoveRecord;
use crate::rendering::pieces::{piece_from_glyph, piece_glyph};

/// Captured-piece log for both sides
///
/// # Fields
///
/// - `white_captured`: White pieces taken by Black
/// - `black_captured`: Black pieces taken by White
///
/// # Usage
///
/// ```rust,ignore
/// captured.add_capture(Color::Black, Role::Queen);
/// let advantage = captured.material_advantage(); // +9 for White
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    /// White pieces that have been captured
    pub white_captured: Vec<char>,
    /// Black pieces that have been captured
    pub black_captured: Vec<char>,
}

impl CapturedPieces {
    /// Record a piece capture
    ///
    /// # Arguments
    ///
    /// * `captured_piece_color` - Color of the piece that was captured
    /// * `role` - Kind of piece that was captured
    pub fn add_capture(&mut self, captured_piece_color: Color, role: Role) {
        let glyph = piece_glyph(captured_piece_color, role);
        match captured_piece_color {
            Color::White => self.white_captured.push(glyph),
            Color::Black => self.black_captured.push(glyph),
        }
    }

    /// Record the capture reported by a move, if it made one
    ///
    /// Returns true when a piece was added.
    pub fn record(&mut self, record: &MoveRecord) -> bool {
        match record.captured {
            Some(role) => {
                self.add_capture(!record.side, role);
                true
            }
            None => false,
        }
    }

    /// Get material advantage in pawns
    ///
    /// Returns positive if White is ahead, negative if Black is ahead, 0 if equal.
    /// Unknown glyphs in a restored list count as zero.
    pub fn material_advantage(&self) -> i32 {
        let taken_by_white: i32 = self.black_captured.iter().map(|g| glyph_value(*g)).sum();
        let taken_by_black: i32 = self.white_captured.iter().map(|g| glyph_value(*g)).sum();
        taken_by_white - taken_by_black
    }

    /// Glyphs joined by spaces, as shown next to the board
    pub fn display(glyphs: &[char]) -> String {
        glyphs
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Clear all captured pieces (for new game)
    pub fn clear(&mut self) {
        self.white_captured.clear();
        self.black_captured.clear();
    }
}

fn glyph_value(glyph: char) -> i32 {
    piece_from_glyph(glyph).map_or(0, |piece| piece_value(piece.role))
}

/// Get the value of a piece in pawns
///
/// King has value 0 as it cannot be captured (game ends in checkmate).
fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight => 3,
        Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}
