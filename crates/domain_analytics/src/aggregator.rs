//! Analytics aggregator
//!
//! Every view is recomputed per call from the claim store and the tunnel
//! manager. Nothing here mutates either; tunnel states are taken from
//! [`TunnelLifecycleManager::snapshot`], which applies expiry to a copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use core_kernel::SharedClock;
use domain_claims::{Claim, ClaimQuery, ClaimStatus, ClaimStore};
use domain_tunnel::{TunnelLifecycleManager, TunnelState};

use crate::error::AnalyticsError;
use crate::trends::{bucketize, BucketSize, TrendReport};

/// Point-in-time summary across claims and tunnels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_claims: usize,
    /// Every status is present, zero included
    pub claims_by_status: BTreeMap<ClaimStatus, usize>,
    pub analyzed_claims: usize,
    pub flagged_claims: usize,
    /// Mean over claims that carry a score; `None` when none does
    pub mean_risk_score: Option<f64>,
    pub total_claimed_amount: Decimal,
    pub total_tunnels: usize,
    /// Every state is present, zero included
    pub tunnels_by_state: BTreeMap<TunnelState, usize>,
    pub active_tunnels: usize,
}

/// Read-only summarizer over claims and tunnels
pub struct AnalyticsAggregator {
    claims: Arc<dyn ClaimStore>,
    tunnels: Arc<TunnelLifecycleManager>,
    clock: SharedClock,
}

impl AnalyticsAggregator {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        tunnels: Arc<TunnelLifecycleManager>,
        clock: SharedClock,
    ) -> Self {
        Self {
            claims,
            tunnels,
            clock,
        }
    }

    /// Counts and totals across claims and tunnels
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` when the claimed amounts cannot be summed.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, AnalyticsError> {
        let claims = self.claims.list_claims().await?;
        let sessions = self.tunnels.snapshot().await;

        let mut claims_by_status: BTreeMap<ClaimStatus, usize> =
            ClaimStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut scores = Vec::new();
        let mut total_claimed_amount = Decimal::ZERO;
        for claim in &claims {
            *claims_by_status.entry(claim.status).or_default() += 1;
            total_claimed_amount = total_claimed_amount
                .checked_add(claim.amount)
                .ok_or(AnalyticsError::AmountOverflow("total claimed amount"))?;
            if let Some(score) = claim.risk_score {
                scores.push(score);
            }
        }

        let mut tunnels_by_state: BTreeMap<TunnelState, usize> =
            TunnelState::ALL.iter().map(|s| (*s, 0)).collect();
        for session in &sessions {
            *tunnels_by_state.entry(session.state).or_default() += 1;
        }

        let mean_risk_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        let snapshot = DashboardSnapshot {
            generated_at: self.clock.now(),
            total_claims: claims.len(),
            analyzed_claims: claims.iter().filter(|c| c.is_analyzed()).count(),
            flagged_claims: claims_by_status
                .get(&ClaimStatus::Flagged)
                .copied()
                .unwrap_or_default(),
            mean_risk_score,
            total_claimed_amount,
            claims_by_status,
            total_tunnels: sessions.len(),
            active_tunnels: sessions.iter().filter(|s| s.state.is_live()).count(),
            tunnels_by_state,
        };

        debug!(
            total_claims = snapshot.total_claims,
            total_tunnels = snapshot.total_tunnels,
            "Dashboard computed"
        );

        Ok(snapshot)
    }

    /// Claim volume per bucket, oldest first
    pub async fn trends(&self, bucket: BucketSize) -> Result<TrendReport, AnalyticsError> {
        let claims = self.claims.list_claims().await?;
        bucketize(&claims, bucket)
    }

    /// Case-insensitive substring search, newest first
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank query.
    pub async fn search(&self, query: &str) -> Result<Vec<Claim>, AnalyticsError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnalyticsError::Validation(
                "search query must not be blank".to_string(),
            ));
        }
        let results = self.claims.find_claims(&ClaimQuery::text(query)).await?;
        debug!(query, hits = results.len(), "Claim search");
        Ok(results)
    }
}
