//! Claims Domain Ports
//!
//! The `ClaimStore` trait is the keyed storage the rest of the system talks
//! to. Mutation goes through [`ClaimStore::update_claim`], which runs the
//! caller's closure while holding that claim's lock, so two concurrent
//! updates of the same claim never interleave while updates of different
//! claims proceed in parallel.
//!
//! ```rust,ignore
//! let store: Arc<dyn ClaimStore> = Arc::new(InMemoryClaimStore::new());
//! let claim = store.insert_claim(Claim::submit(input, now)?).await?;
//! store.update_status(claim.id, ClaimStatus::UnderReview, now).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, DomainPort, HealthCheckable};

use crate::claim::{Claim, ClaimStatus, ClaimType};
use crate::error::ClaimError;

/// Closure applied to a claim under its lock
pub type ClaimMutation<'a> = dyn FnMut(&mut Claim) -> Result<(), ClaimError> + Send + 'a;

/// Query parameters for finding claims
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    /// Filter by status
    pub status: Option<ClaimStatus>,
    /// Filter by claim type
    pub claim_type: Option<ClaimType>,
    /// Case-insensitive substring over customer, claim type and description
    pub text: Option<String>,
}

impl ClaimQuery {
    /// Creates a free-text query
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a query to find by status
    pub fn by_status(status: ClaimStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Adds a claim type filter
    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = Some(claim_type);
        self
    }

    /// Returns true if the claim satisfies every filter that is set
    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(status) = self.status {
            if claim.status != status {
                return false;
            }
        }
        if let Some(claim_type) = self.claim_type {
            if claim.claim_type != claim_type {
                return false;
            }
        }
        if let Some(ref text) = self.text {
            let needle = text.trim().to_lowercase();
            let hit = claim.customer.to_lowercase().contains(&needle)
                || claim.claim_type.as_str().contains(&needle)
                || claim.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Orders claims newest first, breaking ties by id
pub fn sort_newest_first(claims: &mut [Claim]) {
    claims.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

/// Port trait for claim storage
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Stores a new claim
    ///
    /// # Errors
    ///
    /// Returns a conflict if a claim with the same id already exists
    async fn insert_claim(&self, claim: Claim) -> Result<Claim, ClaimError>;

    /// Gets a claim by ID
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, ClaimError>;

    /// Lists all claims, newest first
    async fn list_claims(&self) -> Result<Vec<Claim>, ClaimError>;

    /// Finds claims matching a query, newest first
    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, ClaimError>;

    /// Applies `mutate` to the claim under its lock and persists the result
    ///
    /// If the closure fails the stored claim is left untouched.
    async fn update_claim(
        &self,
        id: ClaimId,
        mutate: &mut ClaimMutation<'_>,
    ) -> Result<Claim, ClaimError>;

    /// Counts stored claims
    async fn count_claims(&self) -> Result<usize, ClaimError>;
}

/// Extension methods for ClaimStore
#[async_trait]
pub trait ClaimStoreExt: ClaimStore {
    /// Moves a claim to a new status, enforcing the forward-only lifecycle
    async fn update_status(
        &self,
        id: ClaimId,
        status: ClaimStatus,
        now: DateTime<Utc>,
    ) -> Result<Claim, ClaimError> {
        self.update_claim(id, &mut |claim: &mut Claim| claim.update_status(status, now))
            .await
    }

    /// Checks whether a claim exists
    async fn claim_exists(&self, id: ClaimId) -> Result<bool, ClaimError> {
        match self.get_claim(id).await {
            Ok(_) => Ok(true),
            Err(ClaimError::ClaimNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// Blanket implementation for all ClaimStore implementors
impl<T: ClaimStore + ?Sized> ClaimStoreExt for T {}
