//! revly-api library - Review dashboard HTTP service
//!
//! Thin route layer over the revly-common pipeline: fetch raw source
//! payloads, look up approval flags, normalize, aggregate, respond.

use std::sync::Arc;

use axum::Router;
use revly_common::config::Config;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (credentials, data dir, sandbox flag)
    pub config: Arc<Config>,
    /// Shared HTTP client for upstream API calls
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/reviews/hostaway", get(api::reviews::get_hostaway_reviews))
        .route("/api/reviews/google", get(api::reviews::get_google_reviews))
        .route(
            "/api/reviews/approve",
            post(api::approve::set_approval).patch(api::approve::set_approvals_batch),
        )
        .route("/api/listings", get(api::listings::get_listings))
        .merge(api::health::health_routes())
        // Permissive CORS for local dashboard development
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
