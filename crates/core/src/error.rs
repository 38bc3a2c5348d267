//! Error types for sonic-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sonic-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sonic-core
#[derive(Error, Debug)]
pub enum Error {
    /// Session store errors
    #[error("Session error: {0}")]
    Session(String),

    /// Session file not found
    #[error("Session file not found: {0}")]
    SessionNotFound(PathBuf),

    /// Invalid session file contents
    #[error("Invalid session file: {0}")]
    InvalidSession(String),

    /// CDN API errors
    #[error("CDN API error: {0}")]
    Api(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,

    /// Cancelled by user
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else if err.is_request() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
