//! Error handling types for authorship tracking
//!
//! This module provides the error type shared by the tracker, the registry,
//! configuration loading and event replay.

use thiserror::Error;

/// Comprehensive error type for authorship operations
#[derive(Debug, Error)]
pub enum AuthorshipError {
    /// Claim with an empty span or an undefined owner
    #[error("Invalid ownership claim [{from}, {to}) for owner {owner:?}")]
    InvalidClaim {
        from: usize,
        to: usize,
        owner: String,
    },

    /// Stored intervals no longer form a valid partition
    #[error("Partition invariant violated: {message}")]
    Invariant { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Malformed event in a replay log
    #[error("Replay error at line {line}: {message}")]
    Replay { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for authorship operations
pub type AuthorshipResult<T> = Result<T, AuthorshipError>;

/// Helper functions for common error patterns
impl AuthorshipError {
    /// Create an invalid claim error
    pub fn invalid_claim(from: usize, to: usize, owner: impl Into<String>) -> Self {
        AuthorshipError::InvalidClaim {
            from,
            to,
            owner: owner.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        AuthorshipError::Invariant {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        AuthorshipError::Config {
            message: message.into(),
        }
    }

    /// Create a replay error for a 1-based line number
    pub fn replay(line: usize, message: impl Into<String>) -> Self {
        AuthorshipError::Replay {
            line,
            message: message.into(),
        }
    }
}
