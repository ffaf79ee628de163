//! Analysis handlers

use axum::extract::State;
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{BatchReport, RiskAssessment};

use crate::dto::ai::*;
use crate::dto::ApiResponse;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::AppState;

/// Scores a claim and writes the result back
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Result<ApiResponse<AnalysisResponse>, ApiError> {
    let analysis = state.analysis.analyze(request.claim_id).await?;
    Ok(ApiResponse::ok(analysis.into()))
}

/// Scores many claims in batches of `AI_BATCH_SIZE`
pub async fn analyze_batch(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BatchAnalyzeRequest>,
) -> Result<ApiResponse<BatchReport>, ApiError> {
    request.validate()?;
    let report = state
        .analysis
        .analyze_batch(&request.claim_ids, &state.batch_control)
        .await?;
    Ok(ApiResponse::ok(report))
}

/// Per-factor breakdown without side effects
pub async fn insights(
    State(state): State<AppState>,
    ApiPath(claim_id): ApiPath<ClaimId>,
) -> Result<ApiResponse<RiskAssessment>, ApiError> {
    let assessment = state.analysis.insights(claim_id).await?;
    Ok(ApiResponse::ok(assessment))
}
