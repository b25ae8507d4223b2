//! Game view - everything the player sees
//!
//! The turn loop and the controls talk to a [`GameView`], never to stdout
//! directly. [`TerminalView`] prints; tests substitute a recording view.
//!
//! # Regions
//!
//! A [`Frame`] carries the text for each region of the screen: the board,
//! the status line, the captured pieces of both sides with the material
//! balance, and the PGN move list. The "thinking" indicator and error line
//! are driven separately since they change between frames.

use parking_lot::Mutex;
use shakmaty::{Board, Color};

use crate::game::ai::Players;
use crate::game::resources::{side_label, status_line, CapturedPieces};
use crate::game::session::GameSession;
use crate::rendering::TextBoard;

/// Snapshot of everything drawn after a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub board: Board,
    pub status: String,
    /// Black pieces taken by White, as glyphs
    pub captured_by_white: String,
    /// White pieces taken by Black, as glyphs
    pub captured_by_black: String,
    /// Positive when White is ahead
    pub material: i32,
    pub pgn: String,
}

impl Frame {
    /// Build a frame from the session under the caller's lock
    pub fn capture(session: &GameSession, players: &Players) -> Self {
        let captured = session.captured();
        Self {
            board: session.game().board().clone(),
            status: status_line(session.game(), session.is_running(), |side| {
                players.name_for(side)
            }),
            captured_by_white: CapturedPieces::display(&captured.black_captured),
            captured_by_black: CapturedPieces::display(&captured.white_captured),
            material: captured.material_advantage(),
            pgn: session.game().pgn(),
        }
    }
}

/// Material balance as shown beside the captured pieces
pub fn format_material(material: i32) -> String {
    match material {
        0 => String::from("="),
        m if m > 0 => format!("White +{}", m),
        m => format!("Black +{}", -m),
    }
}

/// Presentation seam between the game and the screen
pub trait GameView: Send + Sync {
    /// Overlay inviting the player to start a game
    fn show_start_prompt(&self);
    /// Indicator naming the provider that is thinking
    fn show_thinking(&self, name: &str, side: Color);
    fn hide_thinking(&self);
    fn show_frame(&self, frame: &Frame);
    /// Result announcement at the end of a replay
    fn show_banner(&self, text: &str);
    fn show_error(&self, message: &str);
    fn flip_board(&self);
    fn resize_board(&self, square_width: usize);
}

/// View printing to stdout
///
/// Remembers the last frame so flip and resize can redraw it.
///
/// Printed lines cannot be taken back, so the thinking indicator is closed
/// with a line of its own when a loop stops while it is showing. A new frame
/// closes it silently.
#[derive(Debug, Default)]
pub struct TerminalView {
    board: Mutex<TextBoard>,
    last_frame: Mutex<Option<Frame>>,
    /// Label of the side whose indicator is showing
    thinking: Mutex<Option<String>>,
}

impl TerminalView {
    pub fn new(square_width: usize) -> Self {
        let mut board = TextBoard::new();
        board.resize(square_width);
        Self {
            board: Mutex::new(board),
            last_frame: Mutex::new(None),
            thinking: Mutex::new(None),
        }
    }

    /// Full text of a frame as printed
    pub fn render_frame(&self, frame: &Frame) -> String {
        let board = self.board.lock().render(&frame.board);
        format!(
            "{board}\n{status}\nCaptured by White: {by_white}\nCaptured by Black: {by_black}\nMaterial: {material}\nPGN: {pgn}\n",
            status = frame.status,
            by_white = frame.captured_by_white,
            by_black = frame.captured_by_black,
            material = format_material(frame.material),
            pgn = frame.pgn,
        )
    }

    fn redraw(&self) {
        let frame = self.last_frame.lock().clone();
        if let Some(frame) = frame {
            println!("{}", self.render_frame(&frame));
        }
    }
}

impl GameView for TerminalView {
    fn show_start_prompt(&self) {
        println!("Ready to Start. Type 'start' to begin, 'quit' to exit.");
    }

    fn show_thinking(&self, name: &str, side: Color) {
        let label = side_label(side, name);
        println!("{} is thinking...", label);
        *self.thinking.lock() = Some(label);
    }

    fn hide_thinking(&self) {
        if let Some(label) = self.thinking.lock().take() {
            println!("{} stopped thinking.", label);
        }
    }

    fn show_frame(&self, frame: &Frame) {
        self.thinking.lock().take();
        println!("{}", self.render_frame(frame));
        *self.last_frame.lock() = Some(frame.clone());
    }

    fn show_banner(&self, text: &str) {
        println!("*** {} ***", text);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn flip_board(&self) {
        self.board.lock().flip();
        self.redraw();
    }

    fn resize_board(&self, square_width: usize) {
        self.board.lock().resize(square_width);
        self.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ai::ScriptedProvider;

    fn players() -> Players {
        Players::new(
            Box::new(ScriptedProvider::new("Llama 3.3", &[])),
            Box::new(ScriptedProvider::new("Gemini", &[])),
        )
    }

    #[test]
    fn test_frame_regions() {
        let mut session = GameSession::new();
        session.start();
        for mv in ["e4", "d5", "exd5"] {
            session.apply(mv).unwrap();
        }

        let frame = Frame::capture(&session, &players());
        assert_eq!(frame.status, "Black (Gemini) to move.");
        assert_eq!(frame.captured_by_white, "♟");
        assert_eq!(frame.captured_by_black, "");
        assert_eq!(frame.material, 1);
        assert_eq!(frame.pgn, "1. e4 d5 2. exd5");
    }

    #[test]
    fn test_format_material() {
        assert_eq!(format_material(0), "=");
        assert_eq!(format_material(3), "White +3");
        assert_eq!(format_material(-5), "Black +5");
    }

    #[test]
    fn test_render_frame_follows_orientation() {
        let view = TerminalView::new(1);
        let frame = Frame::capture(&GameSession::new(), &players());

        let text = view.render_frame(&frame);
        assert!(text.starts_with("8 ♜♞♝♛♚♝♞♜"));
        assert!(text.contains("Ready to Start"));
        assert!(text.contains("Material: ="));

        view.flip_board();
        assert!(view.render_frame(&frame).starts_with("1 ♖♘♗♔♕♗♘♖"));
    }

    #[test]
    fn test_thinking_indicator_closed_once() {
        let view = TerminalView::new(1);
        view.show_thinking("Gemini", Color::Black);
        assert_eq!(view.thinking.lock().as_deref(), Some("Black (Gemini)"));

        view.hide_thinking();
        assert_eq!(*view.thinking.lock(), None);
        view.hide_thinking();
        assert_eq!(*view.thinking.lock(), None);

        view.show_thinking("Llama 3.3", Color::White);
        view.show_frame(&Frame::capture(&GameSession::new(), &players()));
        assert_eq!(*view.thinking.lock(), None);
    }
}
