//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

use crate::error::{ApiError, InternalErrorDetails};
use crate::AppState;

/// Request logging middleware
///
/// Logs method, uri, status and duration of every request, tagged with the
/// `x-request-id` set by the request-id layer.
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "API request"
    );

    response
}

/// Debug details middleware
///
/// Internal errors leave the handler without details. In debug mode they are
/// rebuilt here with the details included; otherwise the details are dropped.
pub async fn error_details_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let details = response.extensions_mut().remove::<InternalErrorDetails>();

    match details {
        Some(InternalErrorDetails(details)) if state.config.is_debug() => ApiError::envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
            Some(details),
        ),
        _ => response,
    }
}
