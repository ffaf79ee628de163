//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, ManualClock, SharedClock};
use domain_claims::{
    Claim, ClaimAnalysisService, ClaimStore, ClaimType, InMemoryClaimStore, NewClaim,
    RiskScoringEngine, ScoringConfig,
};
use domain_tunnel::{TunnelConfig, TunnelLifecycleManager};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use crate::fixtures::{ClaimFixtures, TemporalFixtures};

/// Builder for constructing test claims
pub struct TestClaimBuilder {
    input: NewClaim,
    created_at: DateTime<Utc>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Starts from the reference claim at the standard start instant
    pub fn new() -> Self {
        Self {
            input: ClaimFixtures::reference(),
            created_at: TemporalFixtures::start(),
        }
    }

    /// Starts from the given input
    pub fn from_input(input: NewClaim) -> Self {
        Self {
            input,
            created_at: TemporalFixtures::start(),
        }
    }

    /// Sets the customer name
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.input.customer = customer.into();
        self
    }

    /// Uses a generated customer name
    pub fn with_random_customer(mut self) -> Self {
        self.input.customer = Name().fake();
        self
    }

    /// Sets the claim type
    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.input.claim_type = claim_type;
        self
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.input.amount = amount;
        self
    }

    /// Sets the creation instant
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds the claim
    ///
    /// # Panics
    ///
    /// Panics if the input fails validation
    pub fn build(self) -> Claim {
        Claim::submit(self.input, self.created_at).expect("test claim should be valid")
    }

    /// Builds the claim and stores it
    pub async fn insert_into(self, store: &dyn ClaimStore) -> Claim {
        store
            .insert_claim(self.build())
            .await
            .expect("test claim should insert")
    }
}

/// In-memory services sharing one manual clock
pub struct TestHarness {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryClaimStore>,
    pub analysis: ClaimAnalysisService,
    pub tunnels: Arc<TunnelLifecycleManager>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default(), TunnelConfig::default())
    }

    /// Custom scoring with the default tunnel settings
    pub fn with_scoring(scoring: ScoringConfig) -> Self {
        Self::with_config(scoring, TunnelConfig::default())
    }

    pub fn with_config(scoring: ScoringConfig, tunnel: TunnelConfig) -> Self {
        let clock = TemporalFixtures::clock();
        let shared: SharedClock = clock.clone();
        let store = Arc::new(InMemoryClaimStore::new());
        let analysis =
            ClaimAnalysisService::new(store.clone(), RiskScoringEngine::new(scoring), shared.clone());
        let tunnels = Arc::new(TunnelLifecycleManager::new(tunnel, shared));
        Self {
            clock,
            store,
            analysis,
            tunnels,
        }
    }

    /// Stores a claim built from `builder`, returning its id
    pub async fn insert(&self, builder: TestClaimBuilder) -> ClaimId {
        builder.insert_into(self.store.as_ref()).await.id
    }
}
