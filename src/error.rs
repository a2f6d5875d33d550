//! Error types for backend access and client-local storage.

use std::time::Duration;
use thiserror::Error;

/// Failure talking to the question-answering backend.
///
/// Callers never branch on the variant: the dashboard and chat widget treat
/// every one of these as "the request failed". The split exists for logs.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend base URL or a derived URL did not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No answer within the caller's deadline.
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
}

/// Failure reading or writing the persisted key-value file.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents were not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
