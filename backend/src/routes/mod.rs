//! Route definitions for the Greenhouse Harvest Planning API

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Candidate views
        .route("/crops/:date", get(handlers::get_available_crops))
        .route("/availability/:date", get(handlers::get_availability))
        .route("/candidates/:date", get(handlers::list_candidates))
        // Harvest scheduling
        .nest("/schedule", schedule_routes())
        // Committed plans
        .nest("/plans", plan_routes())
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/harvest", post(handlers::schedule_harvest))
        .route("/weekly", get(handlers::get_weekly_plan))
        .route("/weeks", get(handlers::get_multi_week_plan))
}

fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/:date", get(handlers::get_plan))
        .route("/:date/add", post(handlers::add_to_plan))
        .route("/:date/commit", post(handlers::commit_selection))
        .route("/:date/remove/:crop_cycle_id", delete(handlers::remove_from_plan))
}
