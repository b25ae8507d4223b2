//! Errors a move provider can report
//!
//! Errors from a remote provider are transient: the turn loop logs them and
//! tries again after the retry delay. [`ProviderError::ScriptExhausted`]
//! comes only from a scripted provider and ends the game.

/// Failure to produce a move string
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Connection, timeout or body decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response JSON lacks the field holding the reply text
    #[error("Response is missing {field}")]
    MissingField { field: &'static str },

    /// The reply text was empty after trimming
    #[error("{provider} returned an empty reply")]
    EmptyReply { provider: String },

    /// Parsing produced an empty move string
    #[error("{provider} reply did not contain a move")]
    EmptyMove { provider: String },

    /// The configured environment variable holds no key
    #[error("No API key for {provider}: set {env_var}")]
    MissingApiKey { provider: String, env_var: String },

    /// The endpoint URL could not be built
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// A scripted provider has no move for this ply
    #[error("Script has no move for ply {ply}")]
    ScriptExhausted { ply: usize },
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
