//! Core module - application infrastructure
//!
//! Everything that is not chess: configuration, error types and the durable
//! store a game session is saved to between runs.
//!
//! # Module Structure
//!
//! - `config` - [`ArenaConfig`]: providers per side, endpoints, turn pacing
//! - `error` - [`CoreError`] and the [`CoreResult`] alias
//! - `session_persistence` - [`GameStore`] over a [`KeyValueStore`] backend
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use llmchess::core::{ArenaConfig, FileKeyValueStore, GameStore};
//!
//! let config = ArenaConfig::load(None)?;
//! let store = GameStore::new(FileKeyValueStore::default_location());
//! if let Some(saved) = store.load() {
//!     println!("resuming {}", saved.pgn);
//! }
//! ```

pub mod config;
pub mod error;
pub mod session_persistence;

// Re-export commonly used items
pub use config::{ArenaConfig, ProviderConfig, RetryPolicy, TurnTiming};
pub use error::{CoreError, CoreResult};
pub use session_persistence::{
    FileKeyValueStore, GameStore, KeyValueStore, MemoryStore, PersistedSession,
};
