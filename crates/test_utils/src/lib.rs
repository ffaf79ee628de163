//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim watch test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for claims, clocks and configuration
//! - `builders`: Builder patterns for claims and a wired service harness
//! - `assertions`: Custom assertion helpers for domain types and JSON envelopes
//! - `generators`: Property-based test data generators
//! - `stores`: Claim store doubles that fail like a lost backend

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod stores;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use stores::*;
