//! Ports and Adapters Infrastructure
//!
//! Domain crates define port traits (for example `ClaimStore`) that extend
//! the marker and health traits here. Adapters implement those traits; the
//! in-memory adapters shipped with this workspace are one such
//! implementation, and a database-backed adapter would be another.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Application services / HTTP           │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │   Port traits (ClaimStore, ...)              │
//! │   defined in each domain crate               │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!                       │
//!             ┌─────────┴─────────┐
//!             │  In-memory adapter │
//!             └───────────────────┘
//! ```

use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Error type for port operations
///
/// Adapter failures that are not about a particular claim.
#[derive(Debug, Error)]
pub enum PortError {
    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// The backing store is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },
}

impl PortError {
    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Maps the port failure onto the shared taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortError::Conflict { .. } => ErrorKind::Conflict,
            PortError::ServiceUnavailable { .. } => ErrorKind::Internal,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is unhealthy and not operational
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
