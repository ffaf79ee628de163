//! Claim store adapters
//!
//! - **InMemoryClaimStore**: keyed in-memory storage with per-claim locks

pub mod memory;

pub use memory::InMemoryClaimStore;
