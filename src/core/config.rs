//! Arena configuration
//!
//! [`ArenaConfig`] describes which provider plays each side, how the remote
//! services are reached, and how the turn loop paces itself. It is read from a
//! JSON file; any field left out falls back to its default, so an empty `{}`
//! is a valid configuration.
//!
//! # File Location
//!
//! `config.json` in the user's configuration directory
//! (e.g. `~/.config/llmchess/config.json`), unless `--config` names a file.
//!
//! # API Keys
//!
//! Keys never live in the file. Each remote provider names the environment
//! variable holding its key (`TOGETHER_API_KEY`, `GEMINI_API_KEY` by default);
//! a `.env` file in the working directory is loaded first.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{CoreError, CoreResult};

/// Config filename
const CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.together.ai/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free";

/// How one side gets its moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Gemini `generateContent` endpoint, key passed as a query parameter
    Gemini {
        name: String,
        endpoint: String,
        temperature: f32,
        api_key_env: String,
    },
    /// OpenAI-style chat completions endpoint, bearer token auth
    ChatCompletions {
        name: String,
        endpoint: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
        api_key_env: String,
    },
    /// Fixed move list (the built-in historical game)
    Scripted { name: String },
}

impl ProviderConfig {
    pub fn default_gemini() -> Self {
        ProviderConfig::Gemini {
            name: String::from("Gemini"),
            endpoint: String::from(DEFAULT_GEMINI_ENDPOINT),
            temperature: 0.5,
            api_key_env: String::from("GEMINI_API_KEY"),
        }
    }

    pub fn default_chat() -> Self {
        ProviderConfig::ChatCompletions {
            name: String::from("Llama 3.3"),
            endpoint: String::from(DEFAULT_CHAT_ENDPOINT),
            model: String::from(DEFAULT_CHAT_MODEL),
            temperature: 0.0,
            max_tokens: 250,
            api_key_env: String::from("TOGETHER_API_KEY"),
        }
    }

    /// Display name of the provider
    pub fn name(&self) -> &str {
        match self {
            ProviderConfig::Gemini { name, .. }
            | ProviderConfig::ChatCompletions { name, .. }
            | ProviderConfig::Scripted { name } => name,
        }
    }

    /// Environment variable holding the API key, for remote providers
    pub fn api_key_env(&self) -> Option<&str> {
        match self {
            ProviderConfig::Gemini { api_key_env, .. }
            | ProviderConfig::ChatCompletions { api_key_env, .. } => Some(api_key_env),
            ProviderConfig::Scripted { .. } => None,
        }
    }
}

/// Delay between failed attempts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Same delay every time
    Fixed { delay_ms: u64 },
    /// `initial_ms * 2^attempt`, capped at `max_ms`
    Exponential { initial_ms: u64, max_ms: u64 },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Fixed { delay_ms: 2000 }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0 for the first retry)
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            RetryPolicy::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            RetryPolicy::Exponential { initial_ms, max_ms } => {
                let factor = 1u64.checked_shl(attempt.min(63)).unwrap_or(u64::MAX);
                Duration::from_millis(initial_ms.saturating_mul(factor).min(max_ms))
            }
        }
    }
}

/// Pacing of the turn loops, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnTiming {
    /// Pause after a successful move
    pub move_delay_ms: u64,
    /// Pause before the first turn of a restored game
    pub resume_delay_ms: u64,
    pub retry: RetryPolicy,
    /// Bounds of the scripted replay's simulated thinking
    pub think_min_ms: u64,
    pub think_max_ms: u64,
}

impl Default for TurnTiming {
    fn default() -> Self {
        Self {
            move_delay_ms: 1000,
            resume_delay_ms: 1000,
            retry: RetryPolicy::default(),
            think_min_ms: 1000,
            think_max_ms: 5000,
        }
    }
}

impl TurnTiming {
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    /// Inclusive think range with the bounds put in order
    pub fn think_range_ms(&self) -> (u64, u64) {
        if self.think_min_ms <= self.think_max_ms {
            (self.think_min_ms, self.think_max_ms)
        } else {
            (self.think_max_ms, self.think_min_ms)
        }
    }
}

/// Whole application configuration
///
/// # Fields
///
/// - `white` / `black`: provider playing each side
/// - `request_timeout_secs`: HTTP timeout for one completion request
/// - `timing`: turn loop pacing
/// - `board_width`: initial square width of the text board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub white: ProviderConfig,
    pub black: ProviderConfig,
    pub request_timeout_secs: u64,
    pub timing: TurnTiming,
    pub board_width: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            white: ProviderConfig::default_chat(),
            black: ProviderConfig::default_gemini(),
            request_timeout_secs: 60,
            timing: TurnTiming::default(),
            board_width: 3,
        }
    }
}

impl ArenaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse a configuration document
    pub fn from_json(contents: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load from an explicit path, or from the default location
    ///
    /// An explicit path must exist and parse. The default file is optional:
    /// missing means defaults, unreadable means a warning and defaults.
    pub fn load(explicit: Option<&Path>) -> CoreResult<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => Ok(Self::load_default()),
        }
    }

    fn load_file(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&contents).map_err(|e| CoreError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("[CONFIG] Loaded configuration from {:?}", path);
        Ok(config)
    }

    fn load_default() -> Self {
        let config_path = default_config_path();

        if !config_path.exists() {
            info!(
                "[CONFIG] No config file found at {:?}. Using defaults.",
                config_path
            );
            return Self::default();
        }

        match Self::load_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("[CONFIG] {}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

/// Path of `config.json` in the user's configuration directory
///
/// Falls back to a local `config.json` if the directory cannot be determined.
pub fn default_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "llmchess", "llmchess") {
        proj_dirs.config_dir().join(CONFIG_FILENAME)
    } else {
        PathBuf::from(CONFIG_FILENAME)
    }
}

/// Load `.env` from the working directory if there is one
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("[CONFIG] Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("[CONFIG] Ignoring unreadable .env file: {}", e),
    }
}

/// Read an API key from the named environment variable; empty counts as unset
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
