//! HTTP API Layer
//!
//! This crate provides the REST API for the claim watch service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, analysis, tunnels and analytics
//! - **Middleware**: Request logging and debug-only internal error details
//! - **DTOs**: Request/Response data transfer objects and the success envelope
//! - **Error Handling**: One error envelope for domain errors and extractor rejections
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, SystemClock::shared());
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use core_kernel::SharedClock;
use domain_analytics::AnalyticsAggregator;
use domain_claims::{
    BatchControl, ClaimAnalysisService, ClaimStore, InMemoryClaimStore, RiskScoringEngine,
};
use domain_tunnel::TunnelLifecycleManager;

use crate::config::AppConfig;
use crate::handlers::{ai, analytics, claims, health, root, tunnel};
use crate::middleware::{error_details_middleware, request_log_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: SharedClock,
    pub claims: Arc<dyn ClaimStore>,
    pub analysis: Arc<ClaimAnalysisService>,
    pub tunnels: Arc<TunnelLifecycleManager>,
    pub analytics: Arc<AnalyticsAggregator>,
    /// Interrupts running batch analyses on shutdown
    pub batch_control: BatchControl,
}

impl AppState {
    /// Wires the services around an empty in-memory claim store
    pub fn new(config: AppConfig, clock: SharedClock) -> Self {
        Self::with_store(config, Arc::new(InMemoryClaimStore::new()), clock)
    }

    pub fn with_store(config: AppConfig, claims: Arc<dyn ClaimStore>, clock: SharedClock) -> Self {
        let engine = RiskScoringEngine::new(config.scoring_config());
        let analysis = Arc::new(ClaimAnalysisService::new(claims.clone(), engine, clock.clone()));
        let tunnels = Arc::new(TunnelLifecycleManager::new(config.tunnel_config(), clock.clone()));
        let analytics = Arc::new(AnalyticsAggregator::new(
            claims.clone(),
            tunnels.clone(),
            clock.clone(),
        ));

        Self {
            config: Arc::new(config),
            clock,
            claims,
            analysis,
            tunnels,
            analytics,
            batch_control: BatchControl::new(),
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = match config.allowed_origins() {
        Ok(Some(origins)) => AllowOrigin::list(origins),
        Ok(None) => AllowOrigin::from(Any),
        Err(e) => {
            warn!(error = %e, "Ignoring CORS_ORIGINS, allowing any origin");
            AllowOrigin::from(Any)
        }
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared services and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let claims_routes = Router::new()
        .route("/", get(claims::list_claims).post(claims::create_claim))
        .route("/search", get(claims::search_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", put(claims::update_status));

    let ai_routes = Router::new()
        .route("/analyze", post(ai::analyze))
        .route("/analyze/batch", post(ai::analyze_batch))
        .route("/insights/:claim_id", get(ai::insights));

    let tunnel_routes = Router::new()
        .route("/create", post(tunnel::create_tunnel))
        .route("/sweep", post(tunnel::sweep))
        .route("/claim/:claim_id", get(tunnel::tunnels_for_claim))
        .route("/:id", get(tunnel::get_tunnel))
        .route("/:id/close", post(tunnel::close_tunnel));

    let analytics_routes = Router::new()
        .route("/dashboard", get(analytics::dashboard))
        .route("/trends", get(analytics::trends));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/claims", claims_routes)
        .nest("/ai", ai_routes)
        .nest("/tunnel", tunnel_routes)
        .nest("/analytics", analytics_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root::index))
        .nest("/api", api_routes)
        .fallback(root::fallback)
        .layer(axum_middleware::from_fn_with_state(state.clone(), error_details_middleware))
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        // Outermost so preflight and error responses carry CORS headers
        .layer(cors)
        .with_state(state)
}
