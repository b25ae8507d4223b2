//! Permissive move notation
//!
//! Language models write moves loosely: `Nf3+` when there is no check, `0-0`
//! for castling, `e2e4`, `Nbd7` written as `Nd7`, a trailing `!?` or a move
//! number glued to the front. [`resolve`] maps such text onto exactly one
//! legal move of the position or reports why it could not.
//!
//! Resolution order:
//!
//! 1. Strict SAN after stripping decoration (`San::from_ascii` + `to_move`)
//! 2. Normalised comparison against every legal move's SAN and coordinate form
//! 3. Piece + destination only, when a single legal move of that piece lands there

use shakmaty::san::San;
use shakmaty::{Chess, Move, Position, Role};

use crate::game::error::{GameError, GameResult};

/// Resolve loosely written move text against the legal moves of `pos`
pub fn resolve(pos: &Chess, raw: &str) -> GameResult<Move> {
    let text = strip_decoration(raw);
    if text.is_empty() {
        return Err(invalid(raw, "empty move text"));
    }

    if let Ok(san) = San::from_ascii(text.as_bytes()) {
        if let Ok(m) = san.to_move(pos) {
            return Ok(m);
        }
    }

    let wanted = normalise(&text);
    let legal = pos.legal_moves();

    let exact: Vec<Move> = legal
        .iter()
        .copied()
        .filter(|m| {
            normalise(&San::from_move(pos, *m).to_string()) == wanted
                || coordinate_form(m).is_some_and(|c| c.eq_ignore_ascii_case(&wanted))
        })
        .collect();
    match exact.as_slice() {
        [m] => return Ok(*m),
        [] => {}
        _ => return Err(invalid(raw, "ambiguous move")),
    }

    let wanted_loose = without_disambiguation(&wanted);
    let loose: Vec<Move> = legal
        .iter()
        .copied()
        .filter(|m| loose_form(m).is_some_and(|l| l == wanted_loose))
        .collect();
    match loose.as_slice() {
        [m] => Ok(*m),
        [] => Err(invalid(raw, "no legal move matches")),
        _ => Err(invalid(raw, "ambiguous move")),
    }
}

fn invalid(raw: &str, reason: &str) -> GameError {
    GameError::InvalidMove {
        text: raw.to_string(),
        reason: reason.to_string(),
    }
}

/// Remove quoting, markdown emphasis, move numbers, check marks and annotations
fn strip_decoration(raw: &str) -> String {
    let mut text = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '_'))
        .trim();

    // "12." / "12..." / "12...Nf6" / "12. Nf6"
    let after_digits = text.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() != text.len() && after_digits.starts_with('.') {
        text = after_digits.trim_start_matches('.').trim_start();
    }

    let text = text.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?' | '.'));
    text.replace('0', "O")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Drop every character that does not change which move is meant
fn normalise(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, 'x' | 'X' | '-' | ':' | '=' | '+' | '#' | '(' | ')'))
        .collect()
}

/// `Ngc3` -> `Nc3`: keep the piece letter and the destination square
fn without_disambiguation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    match chars.first() {
        Some(c) if "NBRQK".contains(*c) && chars.len() > 3 => {
            let dest: String = chars[chars.len() - 2..].iter().collect();
            format!("{}{}", c, dest)
        }
        _ => text.to_string(),
    }
}

/// `e2e4` / `e7e8q`; castling is only matched through its SAN form
fn coordinate_form(m: &Move) -> Option<String> {
    if m.is_castle() {
        return None;
    }
    let from = m.from()?;
    let mut out = format!("{}{}", from, m.to());
    if let Some(promotion) = m.promotion() {
        out.push(promotion.char());
    }
    Some(out)
}

/// Piece letter and destination without disambiguation: `Nd7` for `Nbd7`
fn loose_form(m: &Move) -> Option<String> {
    if m.is_castle() {
        return None;
    }
    match m.role() {
        Role::Pawn => None,
        role => Some(format!("{}{}", role.upper_char(), m.to())),
    }
}
