//! Analysis DTOs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{ClaimAnalysis, ClaimStatus, InsightTag, RiskLevel};

use super::claims::ClaimResponse;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub claim_id: ClaimId,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchAnalyzeRequest {
    #[validate(length(min = 1, max = 10000, message = "claim_ids must hold 1-10000 ids"))]
    pub claim_ids: Vec<ClaimId>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub claim_id: ClaimId,
    pub model_version: String,
    pub score: f64,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub flagged: bool,
    pub requires_manual_review: bool,
    pub tags: BTreeSet<InsightTag>,
    pub previous_status: ClaimStatus,
    pub status: ClaimStatus,
    pub claim: ClaimResponse,
}

impl From<ClaimAnalysis> for AnalysisResponse {
    fn from(analysis: ClaimAnalysis) -> Self {
        let assessment = analysis.assessment;
        Self {
            claim_id: analysis.claim.id,
            model_version: assessment.model_version,
            score: assessment.score,
            confidence: assessment.confidence,
            risk_level: assessment.risk_level,
            flagged: assessment.flagged,
            requires_manual_review: assessment.requires_manual_review,
            tags: assessment.tags,
            previous_status: analysis.previous_status,
            status: analysis.claim.status,
            claim: analysis.claim.into(),
        }
    }
}
