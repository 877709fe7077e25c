//! Error types for moodify

use thiserror::Error;

/// The main error type for moodify operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing secrets, unusable settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream service answered with a non-success status
    #[error("Upstream error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream service could not be reached or timed out
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream payload did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// A specialized Result type for moodify operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
