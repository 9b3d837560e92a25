//! # Error Types for MaxEnt
//!
//! Unified error handling across all maxent crates.

use thiserror::Error;

/// Main error type for maxent operations
#[derive(Error, Debug)]
pub enum MaxentError {
    /// Configuration error (load factor, correction settings, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller supplied an argument the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Key table constructed from a key array with duplicates
    #[error("Array must contain unique keys: duplicate at index {index}")]
    DuplicateKey { index: usize },

    /// Two arrays that must be aligned have different lengths
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `next_event` called on a stream with nothing left
    #[error("Event stream exhausted")]
    StreamExhausted,

    /// No model registered for a domain
    #[error("No model has been created for domain: {0}")]
    DomainNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for maxent operations
pub type MaxentResult<T> = Result<T, MaxentError>;

impl MaxentError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a length mismatch error
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}

impl From<serde_json::Error> for MaxentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
