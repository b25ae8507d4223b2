//! Move providers
//!
//! Each side of the board is played by a [`MoveProvider`]. Two remote
//! providers ask a language model for a move over HTTP; the scripted one
//! replays a fixed game. The turn loop only sees the trait.
//!
//! # Architecture
//!
//! - `provider`: the [`MoveProvider`] trait, [`MoveRequest`] snapshot and the
//!   [`Players`] side-to-provider mapping
//! - `prompt`: natural-language prompts embedding PGN, FEN and legal moves
//! - `parse`: `Best Move:` extraction with the last-line fallback
//! - `gemini` / `chat`: the two HTTP contracts
//! - `scripted`: fixed move list
//!
//! # Building Players From Config
//!
//! ```rust,ignore
//! let config = ArenaConfig::load(None)?;
//! let players = players_from_config(&config)?;
//! println!("{} vs {}", players.name_for(Color::White), players.name_for(Color::Black));
//! ```

pub mod chat;
pub mod error;
pub mod gemini;
pub mod http;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod scripted;

use tracing::warn;

use crate::core::config::{api_key_from_env, ArenaConfig, ProviderConfig};

// Re-export for convenience
pub use chat::ChatCompletionsProvider;
pub use error::{ProviderError, ProviderResult};
pub use gemini::GeminiProvider;
pub use parse::{parse_reply, ParsedReply};
pub use provider::{MoveProvider, MoveRequest, Players};
pub use scripted::{ScriptedProvider, SCRIPTED_MOVES};

/// Build one provider from its configuration
///
/// A missing API key is not an error here; it is logged and every request
/// from that provider fails until the process is restarted with a key.
pub fn provider_from_config(
    config: &ProviderConfig,
    client: &reqwest::Client,
) -> Box<dyn MoveProvider> {
    let api_key = config.api_key_env().and_then(|var| {
        let key = api_key_from_env(var);
        if key.is_none() {
            warn!("[AI] {} is not set; {} cannot move", var, config.name());
        }
        key
    });

    match config {
        ProviderConfig::Gemini {
            name,
            endpoint,
            temperature,
            api_key_env,
        } => Box::new(GeminiProvider::new(
            client.clone(),
            name,
            endpoint,
            *temperature,
            api_key,
            api_key_env,
        )),
        ProviderConfig::ChatCompletions {
            name,
            endpoint,
            model,
            temperature,
            max_tokens,
            api_key_env,
        } => Box::new(ChatCompletionsProvider::new(
            client.clone(),
            name,
            endpoint,
            model,
            *temperature,
            *max_tokens,
            api_key,
            api_key_env,
        )),
        ProviderConfig::Scripted { name } => Box::new(ScriptedProvider::byrne_fischer(name)),
    }
}

/// Both sides from the arena configuration, sharing one HTTP client
pub fn players_from_config(config: &ArenaConfig) -> ProviderResult<Players> {
    let client = http::build_client(config.request_timeout())?;
    Ok(Players::new(
        provider_from_config(&config.white, &client),
        provider_from_config(&config.black, &client),
    ))
}
