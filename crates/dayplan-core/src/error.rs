//! Error types for Dayplan core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for Dayplan operations.
pub type Result<T> = std::result::Result<T, DayplanError>;

/// Core error type for Dayplan operations.
#[derive(Debug, Error)]
pub enum DayplanError {
    /// No valid session for a remote operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced template or todo absent, or not owned by the principal
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or decode failure talking to the remote authority
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local snapshot read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for DayplanError {
    fn from(err: std::io::Error) -> Self {
        DayplanError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DayplanError {
    fn from(err: serde_json::Error) -> Self {
        DayplanError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for DayplanError {
    fn from(err: reqwest::Error) -> Self {
        DayplanError::Transport(err.to_string())
    }
}
