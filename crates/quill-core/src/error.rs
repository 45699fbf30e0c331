//! Error types for the Quill generation pipeline.
//!
//! Fatal faults (config problems, backend failures) are real errors and
//! propagate with `?`. Decode and validation problems are deliberately NOT
//! errors: they are absorbed into the pipeline's [`Outcome`] so partial
//! generation work is never discarded.
//!
//! [`Outcome`]: crate::outcome::Outcome

use thiserror::Error;

/// Top-level error type for Quill operations.
#[derive(Error, Debug)]
pub enum QuillError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// A failure from one backend call attempt.
///
/// Carries the HTTP status and the wire-level error type (e.g.
/// `"rate_limit_error"`) when the backend reported one, so the classifier
/// can decide retryability from structured data instead of message text.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    /// The backend rejected or failed the request
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        status_code: Option<u16>,
        error_type: Option<String>,
    },

    /// The attempt exceeded its per-request timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Strict-decode failure for a reply that is not a well-formed section
/// document. Carries no partial data; recovery belongs to the salvager.
#[derive(Error, Debug)]
#[error("Reply is not a well-formed section document: {message}")]
pub struct DecodeError {
    /// What the decoder rejected
    pub message: String,
}

/// Convenience type alias for Quill results.
pub type Result<T> = std::result::Result<T, QuillError>;
