//! Error types for core module
//!
//! Provides custom error types for core functionality including configuration
//! loading and the key-value store behind session persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O error (config file or state file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be used
    #[error("Invalid configuration at {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// The backing key-value store refused an operation
    #[error("Storage unavailable: {message}")]
    Storage { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
