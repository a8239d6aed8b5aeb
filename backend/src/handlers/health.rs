//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check endpoint handler
///
/// Reports `unhealthy` with 503 when either collaborator cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let check = match state.candidates.health_check().await {
        Ok(()) => state.plans.health_check().await,
        Err(e) => Err(e),
    };

    let (status, body) = match check {
        Ok(()) => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                database: "connected".to_string(),
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "unhealthy".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    database: "disconnected".to_string(),
                    error: Some(e.to_string()),
                },
            )
        }
    };

    (status, Json(body))
}
