//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, ErrorKind, PortError};
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error(transparent)]
    Store(#[from] PortError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::Validation(_) => ErrorKind::Validation,
            ClaimError::ClaimNotFound(_) => ErrorKind::NotFound,
            ClaimError::InvalidStatusTransition { .. } => ErrorKind::InvalidState,
            ClaimError::Store(e) => e.kind(),
            ClaimError::Internal(_) => ErrorKind::Internal,
        }
    }
}
