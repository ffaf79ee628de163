//! Claim Watch - API Server Binary
//!
//! This binary starts the HTTP API server and the background tunnel sweeper.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claim-watch-api
//!
//! # Run with environment variables
//! APP_ENV=production PORT=8080 TUNNEL_TIMEOUT=120 cargo run --bin claim-watch-api
//! ```
//!
//! # Environment Variables
//!
//! * `APP_ENV` - development, testing or production (default: development)
//! * `HOST` / `PORT` - Bind address (default: 0.0.0.0:5000)
//! * `DEBUG` - Include internal error details in responses (default: on in development)
//! * `LOG_LEVEL` - trace, debug, info, warn, error (default: info); `RUST_LOG` wins when set
//! * `CORS_ORIGINS` - Comma-separated origins or `*` (default: `*`)
//! * `AI_MODEL_VERSION`, `AI_ACCURACY_THRESHOLD`, `AI_FRAUD_CUTOFF`, `AI_BATCH_SIZE`
//! * `TUNNEL_PROTOCOL`, `TUNNEL_ENCRYPTION`, `TUNNEL_TIMEOUT`, `TUNNEL_SWEEP_INTERVAL`

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SystemClock;
use domain_claims::BatchControl;
use domain_tunnel::TunnelSweeper;
use interface_api::{config::AppConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or fails validation
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        env = %config.app_env,
        debug = config.is_debug(),
        "Starting Claim Watch API Server"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;

    let state = AppState::new(config, SystemClock::shared());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = TunnelSweeper::from_config(state.tunnels.clone()).spawn(shutdown_rx);

    let batch_control = state.batch_control.clone();
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(batch_control))
        .await?;

    // Stop the sweeper once in-flight requests have drained
    let _ = shutdown_tx.send(true);
    let stats = sweeper.await?;
    tracing::info!(runs = stats.runs, expired = stats.expired, "Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// Running batch analyses are interrupted at their next batch boundary so
/// graceful shutdown does not wait for the whole run.
async fn shutdown_signal(batch_control: BatchControl) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    batch_control.interrupt();
}
