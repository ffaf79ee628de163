//! Core error types used across the system

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error taxonomy shared by every domain crate
///
/// Each domain error maps onto exactly one kind; the HTTP boundary turns the
/// kind into a status code and a wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    Validation,
    /// Referenced entity is absent
    NotFound,
    /// Invariant violation such as a duplicate live tunnel
    Conflict,
    /// Illegal state-machine transition
    InvalidState,
    /// Anything unexpected
    Internal,
}

impl ErrorKind {
    /// Wire code used in error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Configuration(_) => ErrorKind::Internal,
        }
    }
}
