//! PGN movetext reading and writing
//!
//! Only the parts of Portable Game Notation the session needs: writing plain
//! numbered movetext, and pulling SAN tokens back out of a PGN document while
//! skipping tag pairs, comments, variations, NAGs, move numbers and results.

/// Game termination markers that may close a movetext section
const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Format SAN moves as numbered movetext: `1. e4 e5 2. Nf3`
pub fn format_movetext(sans: &[String]) -> String {
    let mut out = String::new();
    for (ply, san) in sans.iter().enumerate() {
        if ply > 0 {
            out.push(' ');
        }
        if ply % 2 == 0 {
            out.push_str(&format!("{}. ", ply / 2 + 1));
        }
        out.push_str(san);
    }
    out
}

/// Extract the mainline SAN tokens of a PGN document in order
pub fn movetext_tokens(pgn: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut comment = false;
    let mut line_comment = false;
    let mut tag = false;
    let mut variation_depth = 0usize;

    for ch in pgn.chars() {
        if line_comment {
            if ch == '\n' {
                line_comment = false;
            }
            continue;
        }
        if comment {
            if ch == '}' {
                comment = false;
            }
            continue;
        }
        if tag {
            if ch == ']' {
                tag = false;
            }
            continue;
        }
        match ch {
            '{' => {
                flush(&mut current, &mut tokens);
                comment = true;
            }
            ';' => {
                flush(&mut current, &mut tokens);
                line_comment = true;
            }
            '[' if variation_depth == 0 => {
                flush(&mut current, &mut tokens);
                tag = true;
            }
            '(' => {
                flush(&mut current, &mut tokens);
                variation_depth += 1;
            }
            ')' => {
                current.clear();
                variation_depth = variation_depth.saturating_sub(1);
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            c if variation_depth == 0 => current.push(c),
            _ => {}
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        if let Some(san) = clean_token(current) {
            tokens.push(san);
        }
        current.clear();
    }
}

/// Strip move numbers, NAGs and results; `None` when nothing playable remains
fn clean_token(raw: &str) -> Option<String> {
    if raw.starts_with('$') || RESULT_TOKENS.contains(&raw) {
        return None;
    }
    // "12." / "12..." / "12...Nf6"
    let rest = raw.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = if rest.len() != raw.len() && rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        raw
    };
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
