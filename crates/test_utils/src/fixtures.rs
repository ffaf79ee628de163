//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for claims, clocks and scoring configuration.
//! These fixtures are designed to be consistent and predictable for unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::ManualClock;
use domain_claims::{ClaimType, NewClaim, ScoringConfig};
use rust_decimal_macros::dec;

/// Fixture for claim input data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// The smoke-test claim: medical, 5000, low risk
    pub fn reference() -> NewClaim {
        NewClaim {
            customer: "Test Customer".to_string(),
            claim_type: ClaimType::Medical,
            amount: dec!(5000),
            description: "This is a test claim for API testing".to_string(),
        }
    }

    /// A claim that scores above the default fraud cutoff
    pub fn suspicious() -> NewClaim {
        NewClaim {
            customer: "Quick Payout".to_string(),
            claim_type: ClaimType::Other,
            amount: dec!(20000),
            description: "urgent cash, stolen".to_string(),
        }
    }

    /// An auto claim with a zero amount
    pub fn zero_amount() -> NewClaim {
        NewClaim {
            customer: "Zed Zero".to_string(),
            claim_type: ClaimType::Auto,
            amount: dec!(0),
            description: "Windscreen chip repaired under warranty".to_string(),
        }
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard start instant (May 1, 2024 09:30 UTC)
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    /// A manual clock frozen at [`Self::start`]
    pub fn clock() -> Arc<ManualClock> {
        ManualClock::shared(Self::start())
    }
}

/// Fixture for configuration
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Small batches so chunking shows up with a handful of claims
    pub fn small_batches(batch_size: usize) -> ScoringConfig {
        ScoringConfig {
            batch_size,
            ..ScoringConfig::default()
        }
    }
}
