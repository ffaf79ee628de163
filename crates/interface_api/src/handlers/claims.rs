//! Claims handlers

use axum::{extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimQuery, ClaimStatus, ClaimStore, ClaimStoreExt, ClaimType};

use crate::dto::claims::*;
use crate::dto::ApiResponse;
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::AppState;

/// Lists claims, newest first
pub async fn list_claims(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListClaimsParams>,
) -> Result<ApiResponse<Vec<ClaimResponse>>, ApiError> {
    let query = ClaimQuery {
        status: params.status.as_deref().map(str::parse::<ClaimStatus>).transpose()?,
        claim_type: params.claim_type.as_deref().map(str::parse::<ClaimType>).transpose()?,
        text: None,
    };

    let claims = state.claims.find_claims(&query).await?;
    Ok(ApiResponse::list(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Creates a new claim in `submitted`
pub async fn create_claim(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateClaimRequest>,
) -> Result<(StatusCode, ApiResponse<ClaimResponse>), ApiError> {
    request.validate()?;
    let claim = Claim::submit(request.into_new_claim()?, state.clock.now())?;
    let claim = state.claims.insert_claim(claim).await?;

    info!(
        claim_id = %claim.id,
        claim_type = %claim.claim_type,
        amount = %claim.amount,
        "Claim submitted"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(claim.into()).with_message("Claim created"),
    ))
}

/// Free-text search over customer, claim type and description
pub async fn search_claims(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<ApiResponse<Vec<ClaimResponse>>, ApiError> {
    let claims = state.analytics.search(&params.q).await?;
    Ok(ApiResponse::list(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ClaimId>,
) -> Result<ApiResponse<ClaimResponse>, ApiError> {
    let claim = state.claims.get_claim(id).await?;
    Ok(ApiResponse::ok(claim.into()))
}

/// Reviewer status change; only forward transitions are accepted
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ClaimId>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<ApiResponse<ClaimResponse>, ApiError> {
    request.validate()?;
    let status: ClaimStatus = request.status.parse()?;
    let claim = state.claims.update_status(id, status, state.clock.now()).await?;

    info!(
        claim_id = %id,
        status = %claim.status,
        reason = request.reason.as_deref().unwrap_or(""),
        "Claim status updated"
    );

    Ok(ApiResponse::ok(claim.into()))
}
