//! Claims DTOs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimStatus, ClaimType, InsightTag, NewClaim};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(min = 1, max = 200, message = "customer must be 1-200 characters"))]
    pub customer: String,
    pub claim_type: String,
    pub amount: Decimal,
    #[serde(default)]
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: String,
}

impl CreateClaimRequest {
    /// Parses the claim type and hands over to the domain
    pub fn into_new_claim(self) -> Result<NewClaim, ApiError> {
        let claim_type: ClaimType = self.claim_type.parse()?;
        Ok(NewClaim {
            customer: self.customer,
            claim_type,
            amount: self.amount,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Query string of `GET /api/claims`
#[derive(Debug, Default, Deserialize)]
pub struct ListClaimsParams {
    pub status: Option<String>,
    pub claim_type: Option<String>,
}

/// Query string of `GET /api/claims/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub customer: String,
    pub claim_type: ClaimType,
    pub amount: Decimal,
    pub description: String,
    pub status: ClaimStatus,
    pub risk_score: Option<f64>,
    pub insight_tags: BTreeSet<InsightTag>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id,
            customer: claim.customer,
            claim_type: claim.claim_type,
            amount: claim.amount,
            description: claim.description,
            status: claim.status,
            risk_score: claim.risk_score,
            insight_tags: claim.insight_tags,
            analyzed_at: claim.analyzed_at,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}
