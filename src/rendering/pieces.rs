//! Piece glyphs
//!
//! The same glyph table is used to draw the board and to record captured
//! pieces, so a stored captured list reads back exactly as it was shown.

use shakmaty::{Color, Piece, Role};

/// Unicode glyph for a piece of the given colour and kind
pub fn piece_glyph(color: Color, role: Role) -> char {
    match (color, role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}

/// Reverse lookup used when scoring a restored captured list
pub fn piece_from_glyph(glyph: char) -> Option<Piece> {
    let (color, role) = match glyph {
        '♙' => (Color::White, Role::Pawn),
        '♘' => (Color::White, Role::Knight),
        '♗' => (Color::White, Role::Bishop),
        '♖' => (Color::White, Role::Rook),
        '♕' => (Color::White, Role::Queen),
        '♔' => (Color::White, Role::King),
        '♟' => (Color::Black, Role::Pawn),
        '♞' => (Color::Black, Role::Knight),
        '♝' => (Color::Black, Role::Bishop),
        '♜' => (Color::Black, Role::Rook),
        '♛' => (Color::Black, Role::Queen),
        '♚' => (Color::Black, Role::King),
        _ => return None,
    };
    Some(Piece { color, role })
}
