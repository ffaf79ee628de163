//! Core Kernel - Foundational types for the claim watch system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for claims and tunnels
//! - The error taxonomy mapped onto the HTTP envelope
//! - Injectable clocks for time-driven behavior
//! - Port and health-check abstractions for storage adapters

pub mod identifiers;
pub mod error;
pub mod temporal;
pub mod ports;

pub use identifiers::{ClaimId, TunnelId};
pub use error::{CoreError, ErrorKind};
pub use temporal::{Clock, ManualClock, SharedClock, SystemClock};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
