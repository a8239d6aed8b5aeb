//! Harvest plan HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{validate_target_yield, CommitSelectionRequest, NewPlanEntry};
use validator::Validate;

use super::{json_body, parse_date_param};
use crate::error::AppError;
use crate::services::{HarvestPlanner, PlanService};
use crate::AppState;

fn plan_service(state: &AppState) -> PlanService {
    PlanService::new(state.plans.clone(), state.config.planning.daily_target_g)
}

/// Add a crop to the plan of a date
pub async fn add_to_plan(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<NewPlanEntry>, JsonRejection>,
) -> impl IntoResponse {
    let date = match parse_date_param(&date) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };
    let entry = match json_body(payload) {
        Ok(entry) => entry,
        Err(e) => return e.into_response(),
    };
    let service = plan_service(&state);

    match service.add_to_plan(date, entry).await {
        Ok(plan_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Crop added to harvest plan",
                "plan_id": plan_id,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Plan of a date with its summary
pub async fn get_plan(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    let date = match parse_date_param(&date) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };
    let service = plan_service(&state);

    match service.get_plan(date).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a crop from the plan of a date
pub async fn remove_from_plan(
    State(state): State<AppState>,
    Path((date, crop_cycle_id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let date = match parse_date_param(&date) {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };
    let service = plan_service(&state);

    match service.remove_from_plan(date, crop_cycle_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Crop removed from harvest plan" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Run the selector for a crop type and commit the chosen batches
pub async fn commit_selection(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<CommitSelectionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date_param(&date)?;
    let request = json_body(payload)?;
    request.validate()?;

    let planning = &state.config.planning;
    let target_yield_g = planning.target_yield_or_default(request.target_yield_g);
    let min_confidence = planning.min_confidence_or_default(request.min_confidence);
    validate_target_yield(target_yield_g)
        .map_err(|msg| AppError::validation("target_yield_g", msg))?;

    let planner = HarvestPlanner::new(state.candidates.clone(), planning.clone());
    let selection = planner
        .schedule_harvest(date, request.crop_type, target_yield_g, min_confidence)
        .await?;
    let outcome = plan_service(&state).commit_selection(&selection).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "selection": selection,
            "added": outcome.added,
            "skipped": outcome.skipped,
        })),
    ))
}
