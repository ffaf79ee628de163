//! Health check handlers

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<HealthCheckResult>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        timestamp: state.clock.now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes the claim store)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<ApiResponse<ReadinessResponse>, ApiError> {
    let store = state.claims.health_check().await;
    if !store.is_healthy() {
        return Err(ApiError::Unavailable(format!(
            "{} is {:?}",
            store.adapter_id, store.status
        )));
    }

    Ok(ApiResponse::ok(ReadinessResponse {
        status: "ready".to_string(),
        checks: vec![store],
    }))
}
