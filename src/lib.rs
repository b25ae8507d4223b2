//! llmchess - two language models play chess in the terminal
//!
//! A remote model plays each side. Their free-form replies are parsed for a
//! `Best Move:` line, resolved through the `shakmaty` rules engine, drawn as a
//! text board, and saved after every move so an interrupted game resumes.
//! A scripted mode replays Byrne vs Fischer, 1956, with simulated thinking.
//!
//! # Modules
//!
//! - [`core`] - configuration, errors, session persistence
//! - [`game`] - rules wrapper, session, move providers, turn loop
//! - [`rendering`] - text board and piece glyphs
//! - [`ui`] - terminal view, controls and the [`ui::Arena`] orchestrator

pub mod core;
pub mod game;
pub mod rendering;
pub mod ui;
