//! Analytics handlers

use axum::extract::State;

use domain_analytics::{BucketSize, DashboardSnapshot};

use crate::dto::analytics::{TrendParams, TrendsResponse};
use crate::dto::ApiResponse;
use crate::error::{ApiError, ApiQuery};
use crate::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<ApiResponse<DashboardSnapshot>, ApiError> {
    Ok(ApiResponse::ok(state.analytics.dashboard().await?))
}

/// Claim volume per bucket; `bucket` defaults to daily
pub async fn trends(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TrendParams>,
) -> Result<TrendsResponse, ApiError> {
    let bucket = match params.bucket.as_deref() {
        Some(raw) => raw.parse::<BucketSize>()?,
        None => BucketSize::default(),
    };
    Ok(state.analytics.trends(bucket).await?.into())
}
