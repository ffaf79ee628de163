//! In-memory claim store
//!
//! Claims live in a `HashMap` of per-claim mutexes. The map lock is held
//! only long enough to find or insert a handle; all mutation happens under
//! the claim's own mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::ports::{sort_newest_first, ClaimMutation, ClaimQuery, ClaimStore};

type ClaimHandle = Arc<Mutex<Claim>>;

/// In-memory implementation of ClaimStore
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<ClaimId, ClaimHandle>>,
}

impl InMemoryClaimStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with claims
    pub async fn with_claims(claims: Vec<Claim>) -> Self {
        let store = Self::new();
        {
            let mut map = store.claims.write().await;
            for claim in claims {
                map.insert(claim.id, Arc::new(Mutex::new(claim)));
            }
        }
        store
    }

    async fn handle(&self, id: ClaimId) -> Result<ClaimHandle, ClaimError> {
        self.claims
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ClaimError::ClaimNotFound(id))
    }

    async fn snapshot(&self) -> Vec<Claim> {
        let handles: Vec<ClaimHandle> = self.claims.read().await.values().cloned().collect();
        let mut claims = Vec::with_capacity(handles.len());
        for handle in handles {
            claims.push(handle.lock().await.clone());
        }
        claims
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl HealthCheckable for InMemoryClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Utc::now();
        let count = self.claims.read().await.len();
        HealthCheckResult {
            adapter_id: "in-memory-claim-store".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: (Utc::now() - started).num_milliseconds().max(0) as u64,
            message: Some(format!("{count} claims held in memory")),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn insert_claim(&self, claim: Claim) -> Result<Claim, ClaimError> {
        let mut map = self.claims.write().await;
        if map.contains_key(&claim.id) {
            return Err(PortError::conflict(format!("claim {} already exists", claim.id)).into());
        }
        map.insert(claim.id, Arc::new(Mutex::new(claim.clone())));
        Ok(claim)
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        let handle = self.handle(id).await?;
        let claim = handle.lock().await.clone();
        Ok(claim)
    }

    async fn list_claims(&self) -> Result<Vec<Claim>, ClaimError> {
        let mut claims = self.snapshot().await;
        sort_newest_first(&mut claims);
        Ok(claims)
    }

    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, ClaimError> {
        let mut claims: Vec<Claim> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|claim| query.matches(claim))
            .collect();
        sort_newest_first(&mut claims);
        Ok(claims)
    }

    async fn update_claim(
        &self,
        id: ClaimId,
        mutate: &mut ClaimMutation<'_>,
    ) -> Result<Claim, ClaimError> {
        let handle = self.handle(id).await?;
        let mut guard = handle.lock().await;

        // Work on a copy so a failed mutation leaves the stored claim intact
        let mut draft = guard.clone();
        mutate(&mut draft)?;
        *guard = draft.clone();
        Ok(draft)
    }

    async fn count_claims(&self) -> Result<usize, ClaimError> {
        Ok(self.claims.read().await.len())
    }
}
