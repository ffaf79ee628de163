//! Tunnel domain errors

use thiserror::Error;

use core_kernel::{ClaimId, ErrorKind, TunnelId};
use crate::session::TunnelState;

/// Errors that can occur in the tunnel domain
#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("Tunnel not found: {0}")]
    NotFound(TunnelId),

    #[error("Claim {claim_id} already has an active tunnel {tunnel_id}")]
    ActiveSessionExists {
        claim_id: ClaimId,
        tunnel_id: TunnelId,
    },

    #[error("Tunnel {tunnel_id} cannot move from {from} to {to}")]
    InvalidTransition {
        tunnel_id: TunnelId,
        from: TunnelState,
        to: TunnelState,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl TunnelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TunnelError::NotFound(_) => ErrorKind::NotFound,
            TunnelError::ActiveSessionExists { .. } => ErrorKind::Conflict,
            TunnelError::InvalidTransition { .. } => ErrorKind::InvalidState,
            TunnelError::Validation(_) => ErrorKind::Validation,
        }
    }
}
