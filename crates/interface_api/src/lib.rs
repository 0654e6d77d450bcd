//! HTTP API Layer
//!
//! This crate provides the REST API for model portfolios and advisory tips
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for portfolios, holdings, calculators and tips
//! - **Middleware**: Request ids, tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects with input validation
//! - **Error Handling**: Consistent error responses
//!
//! Portfolio mutations read a snapshot from the repository, hand it to the
//! [`HoldingsReconciler`], and write the returned snapshot back. Mutations are
//! serialized through [`AppState::portfolio_lock`] so concurrent edits cannot
//! overwrite each other. Tip edits are serialized the same way through
//! [`AppState::tip_lock`]. A handler needing both takes `portfolio_lock` first.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::ApiConfig};
//!
//! let state = AppState::in_memory(ApiConfig::default())?;
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
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use core_kernel::CoreError;
use domain_portfolio::{HoldingsReconciler, PortfolioPort};
use domain_tips::TipPort;
use infra_store::{InMemoryPortfolioRepository, InMemoryTipRepository};

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{calculator, health, holding, portfolio, tip};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub portfolios: Arc<dyn PortfolioPort>,
    pub tips: Arc<dyn TipPort>,
    pub reconciler: HoldingsReconciler,
    pub config: ApiConfig,
    /// Held for the whole read-reconcile-write cycle of a portfolio mutation
    pub portfolio_lock: Arc<Mutex<()>>,
    /// Held for every tip read-modify-write; always taken after `portfolio_lock`
    pub tip_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Builds state over the given repositories
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if the reconciler settings in
    /// `config` are invalid
    pub fn new(
        portfolios: Arc<dyn PortfolioPort>,
        tips: Arc<dyn TipPort>,
        config: ApiConfig,
    ) -> Result<Self, CoreError> {
        let reconciler = HoldingsReconciler::new(config.reconciler_settings()?);
        Ok(Self {
            portfolios,
            tips,
            reconciler,
            config,
            portfolio_lock: Arc::new(Mutex::new(())),
            tip_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Builds state backed by empty in-memory repositories
    pub fn in_memory(config: ApiConfig) -> Result<Self, CoreError> {
        Self::new(
            Arc::new(InMemoryPortfolioRepository::new()),
            Arc::new(InMemoryTipRepository::new()),
            config,
        )
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Repositories, reconciler and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Portfolio routes
    let portfolio_routes = Router::new()
        .route("/", post(portfolio::create_portfolio).get(portfolio::list_portfolios))
        .route(
            "/:id",
            get(portfolio::get_portfolio)
                .put(portfolio::update_portfolio)
                .delete(portfolio::delete_portfolio),
        )
        .route("/:id/valuation", get(portfolio::get_valuation))
        .route("/:id/allocation-preview", post(portfolio::preview_allocation))
        .route("/:id/holdings", post(holding::add_holding))
        .route(
            "/:id/holdings/:symbol",
            put(holding::edit_holding).delete(holding::remove_holding),
        )
        .route("/:id/tips", get(tip::list_portfolio_tips));

    // Calculator routes
    let calculator_routes = Router::new()
        .route("/allocation", post(calculator::allocation))
        .route("/pnl", post(calculator::pnl));

    // Tip routes
    let tip_routes = Router::new()
        .route("/", post(tip::create_tip).get(tip::list_tips))
        .route(
            "/:id",
            get(tip::get_tip).put(tip::update_tip).delete(tip::delete_tip),
        )
        .route("/:id/close", post(tip::close_tip));

    let api_routes = Router::new()
        .nest("/portfolios", portfolio_routes)
        .nest("/calculators", calculator_routes)
        .nest("/tips", tip_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
