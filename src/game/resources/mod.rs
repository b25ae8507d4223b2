//! Chess game resources - per-session state that is not the position itself
//!
//! # Resource Categories
//!
//! ## Game History
//! - [`CapturedPieces`] - Captured-piece glyphs per side and material advantage
//!
//! ## Game Status
//! - [`GameOverState`] - Win/draw classification and status wording

pub mod captured;
pub mod game_over;

pub use captured::CapturedPieces;
pub use game_over::{final_banner, side_label, status_line, GameOverState};
