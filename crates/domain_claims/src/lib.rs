//! Claims Domain
//!
//! This crate implements the claim record, its keyed store, and the risk
//! scoring engine that turns a claim into a score and insight tags.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Under Review -> Flagged / Approved / Rejected
//! ```
//!
//! Analysis moves a submitted claim to review, and a claim under review to
//! flagged when its score reaches the fraud cutoff. Approval and rejection
//! are reviewer decisions.

pub mod claim;
pub mod scoring;
pub mod analysis;
pub mod ports;
pub mod adapters;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimType, NewClaim, MAX_CLAIM_AMOUNT};
pub use scoring::{
    Contribution, InsightTag, RiskAssessment, RiskFactor, RiskLevel, RiskScoringEngine,
    ScoringConfig,
};
pub use analysis::{BatchControl, BatchReport, ClaimAnalysis, ClaimAnalysisService};
pub use ports::{ClaimQuery, ClaimStore, ClaimStoreExt};
pub use adapters::InMemoryClaimStore;
pub use error::ClaimError;
