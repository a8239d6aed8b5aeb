//! Greenhouse Harvest Planning - Backend Server
//!
//! Plans daily and weekly harvests of greenhouse crop batches from ML yield
//! predictions and keeps the committed harvest plan per date.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod sources;
pub mod stores;

pub use config::Config;
pub use error::{AppError, AppResult};

use sources::CandidateSource;
use stores::PlanStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub candidates: Arc<dyn CandidateSource>,
    pub plans: Arc<dyn PlanStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        candidates: Arc<dyn CandidateSource>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            candidates,
            plans,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Greenhouse Harvest Planning API v1.0"
}
