//! Analytics domain errors

use thiserror::Error;

use core_kernel::ErrorKind;
use domain_claims::ClaimError;
use domain_tunnel::TunnelError;

/// Errors that can occur while building analytics views
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A running amount total left the representable range
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error(transparent)]
    Claims(#[from] ClaimError),

    #[error(transparent)]
    Tunnels(#[from] TunnelError),
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::Validation(_) => ErrorKind::Validation,
            AnalyticsError::AmountOverflow(_) => ErrorKind::Internal,
            AnalyticsError::Claims(e) => e.kind(),
            AnalyticsError::Tunnels(e) => e.kind(),
        }
    }
}
