//! Text chess board
//!
//! Draws a `shakmaty::Board` as unicode ranks with coordinates. The board is a
//! pure function of the position plus two bits of view state: which side sits
//! at the bottom and how wide each square is drawn.

use shakmaty::{Board, Color, File, Rank, Square};

use crate::rendering::pieces::piece_glyph;

/// Narrowest square the board will draw
pub const MIN_SQUARE_WIDTH: usize = 1;
/// Widest square the board will draw
pub const MAX_SQUARE_WIDTH: usize = 5;
const DEFAULT_SQUARE_WIDTH: usize = 3;

const LIGHT_SQUARE: char = ' ';
const DARK_SQUARE: char = '·';

/// Terminal board renderer
///
/// Starts with White at the bottom and three columns per square, the
/// counterpart of a non-draggable board widget showing the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBoard {
    orientation: Color,
    square_width: usize,
}

impl Default for TextBoard {
    fn default() -> Self {
        Self {
            orientation: Color::White,
            square_width: DEFAULT_SQUARE_WIDTH,
        }
    }
}

impl TextBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side drawn at the bottom of the board
    pub fn orientation(&self) -> Color {
        self.orientation
    }

    pub fn square_width(&self) -> usize {
        self.square_width
    }

    /// Turn the board around
    pub fn flip(&mut self) {
        self.orientation = !self.orientation;
    }

    /// Change the square width, clamped to the supported range
    pub fn resize(&mut self, square_width: usize) {
        self.square_width = square_width.clamp(MIN_SQUARE_WIDTH, MAX_SQUARE_WIDTH);
    }

    /// Render the board, one text line per rank plus a file legend
    pub fn render(&self, board: &Board) -> String {
        let (ranks, files) = self.axes();
        let mut out = String::new();

        for (rank_index, rank) in ranks.iter() {
            out.push(rank.char());
            out.push(' ');
            for (file_index, file) in files.iter() {
                let square = Square::from_coords(*file, *rank);
                let glyph = match board.piece_at(square) {
                    Some(piece) => piece_glyph(piece.color, piece.role),
                    None if (file_index + rank_index) % 2 == 0 => DARK_SQUARE,
                    None => LIGHT_SQUARE,
                };
                out.push_str(&self.cell(glyph));
            }
            out.push('\n');
        }

        out.push_str("  ");
        for (_, file) in files.iter() {
            out.push_str(&self.cell(file.char()));
        }
        out.push('\n');
        out
    }

    /// Ranks top to bottom and files left to right for the current orientation
    #[allow(clippy::type_complexity)]
    fn axes(&self) -> (Vec<(usize, Rank)>, Vec<(usize, File)>) {
        let mut ranks: Vec<(usize, Rank)> = Rank::ALL.into_iter().enumerate().collect();
        let mut files: Vec<(usize, File)> = File::ALL.into_iter().enumerate().collect();
        match self.orientation {
            Color::White => ranks.reverse(),
            Color::Black => files.reverse(),
        }
        (ranks, files)
    }

    fn cell(&self, glyph: char) -> String {
        let left = (self.square_width - 1) / 2;
        let right = self.square_width - 1 - left;
        format!("{}{}{}", " ".repeat(left), glyph, " ".repeat(right))
    }
}
