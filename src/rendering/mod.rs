//! Rendering module - text chess board for the terminal
//!
//! # Architecture
//!
//! - `board` - [`TextBoard`], renders a `shakmaty::Board` with flip and resize
//! - `pieces` - unicode glyphs shared by the board and the captured-piece log

pub mod board;
pub mod pieces;

pub use board::TextBoard;
pub use pieces::{piece_glyph, piece_from_glyph};
