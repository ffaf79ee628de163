//! Claim Store Doubles
//!
//! Stores that fail the way a lost backend would, for exercising readiness
//! and error mapping above the port.

use async_trait::async_trait;
use chrono::Utc;

use core_kernel::{AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::ports::ClaimMutation;
use domain_claims::{Claim, ClaimError, ClaimQuery, ClaimStore};

const ADAPTER_ID: &str = "unavailable-claim-store";

/// A claim store whose backend is down
///
/// Health checks report unhealthy and every operation fails with
/// [`PortError::ServiceUnavailable`].
#[derive(Debug, Default)]
pub struct UnavailableClaimStore;

impl UnavailableClaimStore {
    pub fn new() -> Self {
        Self
    }

    fn down<T>() -> Result<T, ClaimError> {
        Err(PortError::unavailable(ADAPTER_ID).into())
    }
}

impl DomainPort for UnavailableClaimStore {}

#[async_trait]
impl HealthCheckable for UnavailableClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms: 0,
            message: Some("backend unreachable".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimStore for UnavailableClaimStore {
    async fn insert_claim(&self, _claim: Claim) -> Result<Claim, ClaimError> {
        Self::down()
    }

    async fn get_claim(&self, _id: ClaimId) -> Result<Claim, ClaimError> {
        Self::down()
    }

    async fn list_claims(&self) -> Result<Vec<Claim>, ClaimError> {
        Self::down()
    }

    async fn find_claims(&self, _query: &ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        Self::down()
    }

    async fn update_claim(
        &self,
        _id: ClaimId,
        _mutate: &mut ClaimMutation<'_>,
    ) -> Result<Claim, ClaimError> {
        Self::down()
    }

    async fn count_claims(&self) -> Result<usize, ClaimError> {
        Self::down()
    }
}
