//! Tunnel Domain
//!
//! A tunnel is a bounded-lifetime secured channel associated with one claim.
//! Protocol and encryption are descriptive labels; no cryptography runs here.
//!
//! # Session Lifecycle
//!
//! ```text
//! INIT -> HANDSHAKING -> ESTABLISHED -> CLOSED | EXPIRED
//! ```
//!
//! A claim has at most one live (non-terminal) session at a time. Sessions
//! expire `timeout` after creation unless closed first; expiry is applied
//! lazily on every read and periodically by the [`TunnelSweeper`].

pub mod session;
pub mod manager;
pub mod sweeper;
pub mod config;
pub mod error;

pub use session::{TunnelSession, TunnelState, TunnelTransition};
pub use manager::TunnelLifecycleManager;
pub use sweeper::{SweepStats, TunnelSweeper};
pub use config::TunnelConfig;
pub use error::TunnelError;
