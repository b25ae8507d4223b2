//! UI module - terminal front end
//!
//! - **view**: [`GameView`] trait, [`Frame`] snapshot and the stdout
//!   [`TerminalView`]
//! - **controls**: stdin command parsing (start, new, flip, resize, quit)
//! - **app**: [`Arena`], which restores the saved game at startup and turns
//!   commands into session changes and turn-loop tasks

pub mod app;
pub mod controls;
pub mod view;

// Re-export commonly used items
pub use app::{Arena, ArenaMode};
pub use controls::{parse_command, Command};
pub use view::{Frame, GameView, TerminalView};
