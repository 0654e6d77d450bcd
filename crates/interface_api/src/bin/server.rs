//! Model Portfolio API Server Binary
//!
//! Starts the HTTP API for model portfolios and advisory tips, backed by
//! in-memory repositories.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin portfolio-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_SHARE_ROUNDING=tolerance cargo run --bin portfolio-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_SHARE_ROUNDING` - `floor` or `tolerance` (default: floor)
//! * `API_ROUNDING_TOLERANCE_PERCENT` - Round-up tolerance in percent of one share (default: 10)
//! * `API_SOLD_HOLDING_RETENTION` - `remove`, `retain_zeroed` or `archive` (default: retain_zeroed)
//! * `API_REINVEST_REALIZED_PROFIT` - Compound realized gains into the minimum investment (default: false)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{create_router, config::ApiConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - Reconciler settings are invalid
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading API_ configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        share_rounding = ?config.share_rounding,
        retention = ?config.sold_holding_retention,
        "Starting Model Portfolio API Server"
    );

    let state = AppState::in_memory(config.clone()).context("building application state")?;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
}
