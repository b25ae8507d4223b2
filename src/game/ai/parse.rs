//! Reply parsing
//!
//! Models are told to end with a `Best Move:` line but do not always obey.
//! The policy is:
//!
//! 1. Every line that starts with `best move:` (any case) is a candidate; the
//!    last one wins. All other lines are thoughts.
//! 2. With no such line, the last line of the reply is taken as the move and
//!    the reply is flagged as a fallback.
//! 3. One trailing period is stripped from the move.
//!
//! [`parse_reply`] never fails. [`extract_move`] wraps it for providers: it
//! logs the reasoning and rejects empty replies and empty moves.

use tracing::{debug, info, warn};

use crate::game::ai::error::{ProviderError, ProviderResult};

const BEST_MOVE_PREFIX: &str = "best move:";

/// Move and reasoning split out of one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub mv: String,
    /// Lines that were not a `Best Move:` line
    pub thoughts: Vec<String>,
    /// True when no `Best Move:` line was found
    pub used_fallback: bool,
}

/// Split a model reply into move and thoughts
pub fn parse_reply(reply: &str) -> ParsedReply {
    let reply = reply.trim();
    let mut candidate: Option<String> = None;
    let mut thoughts = Vec::new();

    for line in reply.lines() {
        match strip_prefix_ignore_case(line.trim_start(), BEST_MOVE_PREFIX) {
            Some(rest) => candidate = Some(rest.trim().to_string()),
            None => thoughts.push(line.to_string()),
        }
    }

    let used_fallback = candidate.is_none();
    let raw = candidate.unwrap_or_else(|| reply.lines().last().unwrap_or("").trim().to_string());

    ParsedReply {
        mv: strip_trailing_period(&raw).to_string(),
        thoughts,
        used_fallback,
    }
}

/// Parse a provider reply into a move, logging the thoughts
pub fn extract_move(provider: &str, reply: &str) -> ProviderResult<String> {
    if reply.trim().is_empty() {
        return Err(ProviderError::EmptyReply {
            provider: provider.to_string(),
        });
    }

    let parsed = parse_reply(reply);
    if !parsed.thoughts.is_empty() {
        info!("[AI] --- {} is Thinking ---", provider);
        for line in &parsed.thoughts {
            debug!("[AI] {}", line);
        }
    }
    if parsed.used_fallback {
        warn!(
            "[AI] {} did not use 'Best Move:' format. Taking last line as move.",
            provider
        );
    }
    if parsed.mv.is_empty() {
        return Err(ProviderError::EmptyMove {
            provider: provider.to_string(),
        });
    }

    info!("[AI] {} chose {}", provider, parsed.mv);
    Ok(parsed.mv)
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..)
    } else {
        None
    }
}

fn strip_trailing_period(text: &str) -> &str {
    text.strip_suffix('.').unwrap_or(text)
}
