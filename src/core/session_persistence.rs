//! Session persistence system
//!
//! Saves and restores the running game so a restarted process picks up where
//! the last one stopped. Three keys are written, mirroring a browser's
//! origin-scoped storage: the PGN text and the two captured-piece lists.
//!
//! # File Location
//!
//! [`FileKeyValueStore`] keeps all keys in one `session.json` object inside the
//! user's data directory (e.g. `~/.local/share/llmchess/session.json`), or in
//! an explicit state directory. Falls back to a local `session.json` if the
//! platform directory cannot be determined.
//!
//! # Error Handling
//!
//! Persistence is best-effort: [`GameStore::save`] and [`GameStore::clear`]
//! log failures and carry on, [`GameStore::load`] reports "no session" on any
//! read or parse problem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::core::error::{CoreError, CoreResult};

/// Key holding the PGN movetext
pub const PGN_KEY: &str = "chessGamePgn";
/// Key holding the JSON array of captured White glyphs
pub const WHITE_CAPTURED_KEY: &str = "chessGameWhiteCaptured";
/// Key holding the JSON array of captured Black glyphs
pub const BLACK_CAPTURED_KEY: &str = "chessGameBlackCaptured";

/// State filename
const SESSION_FILENAME: &str = "session.json";

/// What the store holds for one game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub pgn: String,
    pub white_captured: Vec<char>,
    pub black_captured: Vec<char>,
}

/// Minimal string key-value storage
///
/// Implementations may fail on any call; [`GameStore`] absorbs the failures.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-process store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-object file store
///
/// Every write rewrites the whole file; the lock serialises writers within
/// the process.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Store backed by `session.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILENAME),
            lock: Mutex::new(()),
        }
    }

    /// Store in the platform data directory
    pub fn default_location() -> Self {
        match ProjectDirs::from("com", "llmchess", "llmchess") {
            Some(dirs) => Self::in_dir(dirs.data_dir()),
            // Fallback to current directory
            None => Self::in_dir("."),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> CoreResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Game State Store: save, load and clear one session
pub struct GameStore {
    backend: Box<dyn KeyValueStore>,
}

impl GameStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Write all three keys; the first failure is logged and ends the save
    pub fn save(&self, session: &PersistedSession) {
        if let Err(e) = self.try_save(session) {
            error!("[STORE] Session save failed: {}", e);
        } else {
            debug!("[STORE] Saved session ({} bytes of PGN)", session.pgn.len());
        }
    }

    fn try_save(&self, session: &PersistedSession) -> CoreResult<()> {
        self.backend.set(PGN_KEY, &session.pgn)?;
        self.backend
            .set(WHITE_CAPTURED_KEY, &serde_json::to_string(&session.white_captured)?)?;
        self.backend
            .set(BLACK_CAPTURED_KEY, &serde_json::to_string(&session.black_captured)?)?;
        Ok(())
    }

    /// Read the stored session; absent when there is no PGN or it is empty
    ///
    /// A captured list that is missing reads as empty; one that does not parse
    /// makes the whole session unusable.
    pub fn load(&self) -> Option<PersistedSession> {
        match self.try_load() {
            Ok(Some(session)) => {
                info!("[STORE] Found saved session: {}", session.pgn);
                Some(session)
            }
            Ok(None) => {
                info!("[STORE] No saved session found.");
                None
            }
            Err(e) => {
                warn!("[STORE] Session load failed: {}. Starting fresh.", e);
                None
            }
        }
    }

    fn try_load(&self) -> CoreResult<Option<PersistedSession>> {
        let pgn = match self.backend.get(PGN_KEY)? {
            Some(pgn) if !pgn.is_empty() => pgn,
            _ => return Ok(None),
        };
        Ok(Some(PersistedSession {
            pgn,
            white_captured: self.captured_list(WHITE_CAPTURED_KEY)?,
            black_captured: self.captured_list(BLACK_CAPTURED_KEY)?,
        }))
    }

    fn captured_list(&self, key: &str) -> CoreResult<Vec<char>> {
        match self.backend.get(key)? {
            Some(json) => serde_json::from_str(&json).map_err(CoreError::from),
            None => Ok(Vec::new()),
        }
    }

    /// Remove all three keys; every key is attempted even if one fails
    pub fn clear(&self) {
        for key in [PGN_KEY, WHITE_CAPTURED_KEY, BLACK_CAPTURED_KEY] {
            if let Err(e) = self.backend.remove(key) {
                error!("[STORE] Failed to clear {}: {}", key, e);
            }
        }
    }
}
