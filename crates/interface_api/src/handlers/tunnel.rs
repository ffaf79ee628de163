//! Tunnel handlers

use axum::{extract::State, http::StatusCode};
use validator::Validate;

use core_kernel::{ClaimId, TunnelId};

use crate::dto::tunnel::*;
use crate::dto::ApiResponse;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::AppState;

/// Opens a tunnel for an existing claim
pub async fn create_tunnel(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTunnelRequest>,
) -> Result<(StatusCode, ApiResponse<TunnelResponse>), ApiError> {
    request.validate()?;
    // Resolve the claim first so an unknown id is NOT_FOUND, not a new slot
    state.claims.get_claim(request.claim_id).await?;

    let session = state
        .tunnels
        .create_tunnel(request.claim_id, request.protocol, request.encryption)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(TunnelResponse::from_session(session, state.clock.now()))
            .with_message("Tunnel established"),
    ))
}

pub async fn get_tunnel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TunnelId>,
) -> Result<ApiResponse<TunnelResponse>, ApiError> {
    let session = state.tunnels.get_tunnel(id).await?;
    Ok(ApiResponse::ok(TunnelResponse::from_session(session, state.clock.now())))
}

pub async fn close_tunnel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TunnelId>,
) -> Result<ApiResponse<TunnelResponse>, ApiError> {
    let session = state.tunnels.close_tunnel(id).await?;
    Ok(ApiResponse::ok(TunnelResponse::from_session(session, state.clock.now()))
        .with_message("Tunnel closed"))
}

/// Session history of a claim, newest first
pub async fn tunnels_for_claim(
    State(state): State<AppState>,
    ApiPath(claim_id): ApiPath<ClaimId>,
) -> Result<ApiResponse<Vec<TunnelResponse>>, ApiError> {
    state.claims.get_claim(claim_id).await?;
    let sessions = state.tunnels.tunnels_for_claim(claim_id).await?;
    let now = state.clock.now();
    Ok(ApiResponse::list(
        sessions
            .into_iter()
            .map(|s| TunnelResponse::from_session(s, now))
            .collect(),
    ))
}

/// Runs a sweep immediately
pub async fn sweep(State(state): State<AppState>) -> ApiResponse<SweepResponse> {
    let expired = state.tunnels.sweep_expired().await;
    ApiResponse::ok(SweepResponse { expired })
}
