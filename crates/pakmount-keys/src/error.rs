//! Error types for key acquisition

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching or parsing archive keys
#[derive(Debug, Error)]
pub enum KeyError {
    /// Transport-level failure talking to the key service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The key service answered with a non-success status
    #[error("HTTP status: {0}")]
    HttpStatus(StatusCode),

    /// The key service response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A key was not valid hex
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// A key decoded to the wrong number of bytes
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
