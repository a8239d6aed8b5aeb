//! Harvest planning HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::Deserialize;
use shared::{
    validate_target_yield, AvailableCrops, HarvestSelection, ScheduleHarvestRequest,
    WeeklyHarvestPlan,
};
use validator::Validate;

use super::{json_body, parse_crop_types, parse_date_param};
use crate::error::{AppError, AppResult};
use crate::services::HarvestPlanner;
use crate::AppState;

/// Most week starts accepted by one multi-week request
pub const MAX_WEEK_STARTS: usize = 12;

/// Query parameters naming crop types (`?crop_types=LETTUCE,KALE`)
#[derive(Debug, Default, Deserialize)]
pub struct CropTypesQuery {
    pub crop_types: Option<String>,
}

/// Query parameters for the candidate listing
#[derive(Debug, Deserialize)]
pub struct CandidatesQuery {
    pub crop_type: Option<String>,
}

/// Query parameters for a weekly plan
#[derive(Debug, Deserialize)]
pub struct WeeklyPlanQuery {
    /// Defaults to the Monday of the current week
    pub week_start: Option<String>,
    pub crop_types: Option<String>,
}

/// Query parameters for plans over several weeks
#[derive(Debug, Deserialize)]
pub struct MultiWeekPlanQuery {
    /// Comma separated week start dates
    pub starts: String,
    pub crop_types: Option<String>,
}

fn planner(state: &AppState) -> HarvestPlanner {
    HarvestPlanner::new(state.candidates.clone(), state.config.planning.clone())
}

fn current_week_start() -> NaiveDate {
    let today = Utc::now().date_naive();
    let offset = u64::from(today.weekday().num_days_from_monday());
    today.checked_sub_days(Days::new(offset)).unwrap_or(today)
}

/// Confident crops for a date not yet in its plan, grouped by crop type
pub async fn get_available_crops(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<AvailableCrops>> {
    let date = parse_date_param(&date)?;
    let crops = planner(&state).available_crops(date, state.plans.as_ref()).await?;
    Ok(Json(crops))
}

/// Availability summary per crop type for a date
pub async fn get_availability(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<CropTypesQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = parse_date_param(&date)?;
    let planner = planner(&state);
    let crop_types = planner.crop_types_or_default(parse_crop_types(query.crop_types.as_deref())?);

    let availability = planner.summarize_availability(date, &crop_types).await?;
    Ok(Json(serde_json::json!({
        "date": date,
        "availability": availability,
    })))
}

/// Eligible candidates for a date, optionally for one crop type
pub async fn list_candidates(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<CandidatesQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = parse_date_param(&date)?;
    let mut crop_types = parse_crop_types(query.crop_type.as_deref())?;
    if crop_types.len() > 1 {
        return Err(AppError::validation("crop_type", "Only one crop type may be given"));
    }
    let crop_type = crop_types.pop();

    let candidates = planner(&state).candidates(date, crop_type.as_ref()).await?;
    Ok(Json(serde_json::json!({
        "date": date,
        "count": candidates.len(),
        "candidates": candidates,
    })))
}

/// Select batches for one crop type on one date
pub async fn schedule_harvest(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleHarvestRequest>, JsonRejection>,
) -> AppResult<Json<HarvestSelection>> {
    let request = json_body(payload)?;
    request.validate()?;

    let planning = &state.config.planning;
    let target_yield_g = planning.target_yield_or_default(request.target_yield_g);
    let min_confidence = planning.min_confidence_or_default(request.min_confidence);
    validate_target_yield(target_yield_g)
        .map_err(|msg| AppError::validation("target_yield_g", msg))?;

    let selection = planner(&state)
        .schedule_harvest(request.target_date, request.crop_type, target_yield_g, min_confidence)
        .await?;
    Ok(Json(selection))
}

/// Weekly harvest plan
pub async fn get_weekly_plan(
    State(state): State<AppState>,
    Query(query): Query<WeeklyPlanQuery>,
) -> AppResult<Json<WeeklyHarvestPlan>> {
    let week_start = match query.week_start.as_deref() {
        Some(value) => parse_date_param(value)?,
        None => current_week_start(),
    };
    let planner = planner(&state);
    let crop_types = planner.crop_types_or_default(parse_crop_types(query.crop_types.as_deref())?);

    let plan = planner.plan_week(week_start, &crop_types).await?;
    Ok(Json(plan))
}

/// Weekly plans for several week starts
pub async fn get_multi_week_plan(
    State(state): State<AppState>,
    Query(query): Query<MultiWeekPlanQuery>,
) -> AppResult<Json<Vec<WeeklyHarvestPlan>>> {
    let starts = query
        .starts
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_date_param)
        .collect::<AppResult<Vec<_>>>()?;
    if starts.is_empty() {
        return Err(AppError::validation("starts", "At least one week start is required"));
    }
    if starts.len() > MAX_WEEK_STARTS {
        return Err(AppError::validation(
            "starts",
            format!("At most {} week starts may be given", MAX_WEEK_STARTS),
        ));
    }

    let planner = planner(&state);
    let crop_types = planner.crop_types_or_default(parse_crop_types(query.crop_types.as_deref())?);

    let plans = planner.plan_weeks(&starts, &crop_types).await?;
    Ok(Json(plans))
}
