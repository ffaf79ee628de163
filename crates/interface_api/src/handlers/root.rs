//! Service banner and unknown-route fallback

use std::collections::BTreeMap;

use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::dto::ApiResponse;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Service banner and endpoint index
pub async fn index() -> ApiResponse<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("health", "/api/health"),
        ("claims", "/api/claims"),
        ("ai", "/api/ai"),
        ("tunneling", "/api/tunnel"),
        ("analytics", "/api/analytics"),
    ]);

    ApiResponse::ok(ServiceInfo {
        name: "Claim Watch API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// Any route that matches nothing
pub async fn fallback() -> Response {
    ApiError::envelope(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found", None)
}
