//! WebAssembly module for Greenhouse Harvest Planning
//!
//! Provides client-side computation for:
//! - Previewing a harvest selection before committing it
//! - Availability summaries over fetched candidates
//! - Harvest days of a planning week
//! - Offline validation of plan entries

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("greenhouse harvest planning module loaded"));
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).map_err(|e| format!("{}: '{}'", e, value))
}

fn parse_candidates(candidates_json: &str) -> Result<Vec<HarvestCandidate>, String> {
    serde_json::from_str(candidates_json).map_err(|e| format!("Invalid candidates JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn selection_preview(
    candidates_json: &str,
    target_date: &str,
    crop_type: &str,
    target_yield_g: f64,
    min_confidence: f64,
) -> Result<String, String> {
    let target_date = parse_date(target_date)?;
    validate_crop_type(crop_type)?;
    validate_target_yield(target_yield_g)?;
    validate_confidence(min_confidence)?;

    let crop_type = CropType::new(crop_type);
    let candidates: Vec<HarvestCandidate> = parse_candidates(candidates_json)?
        .into_iter()
        .filter(|c| c.crop == crop_type)
        .collect();

    let selection = shared::select_harvest(
        &candidates,
        target_date,
        crop_type,
        target_yield_g,
        min_confidence,
    );
    to_json(&selection)
}

fn availability_summary(candidates_json: &str) -> Result<String, String> {
    let mut by_crop: BTreeMap<CropType, Vec<HarvestCandidate>> = BTreeMap::new();
    for candidate in parse_candidates(candidates_json)? {
        by_crop.entry(candidate.crop.clone()).or_default().push(candidate);
    }
    let summaries: Vec<CropAvailabilitySummary> = by_crop
        .iter()
        .filter_map(|(crop, list)| shared::summarize_crop(crop, list))
        .collect();
    to_json(&summaries)
}

fn week_harvest_days(week_start: &str) -> Result<String, String> {
    let days: Vec<String> = shared::harvest_days(parse_date(week_start)?)
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    to_json(&days)
}

/// Run the harvest selector over candidates fetched by the client
///
/// Returns the selection as JSON. Candidates of other crop types are ignored.
#[wasm_bindgen]
pub fn preview_harvest_selection(
    candidates_json: &str,
    target_date: &str,
    crop_type: &str,
    target_yield_g: f64,
    min_confidence: f64,
) -> Result<String, JsValue> {
    selection_preview(candidates_json, target_date, crop_type, target_yield_g, min_confidence)
        .map_err(|e| JsValue::from_str(&e))
}

/// Summarize candidates per crop type, as a JSON array
#[wasm_bindgen]
pub fn summarize_availability_json(candidates_json: &str) -> Result<String, JsValue> {
    availability_summary(candidates_json).map_err(|e| JsValue::from_str(&e))
}

/// Harvest days of the planning week starting at `week_start`, as a JSON array
#[wasm_bindgen]
pub fn harvest_days_json(week_start: &str) -> Result<String, JsValue> {
    week_harvest_days(week_start).map_err(|e| JsValue::from_str(&e))
}

/// Validate a plan entry before it is sent to the server
///
/// Returns an empty string when valid, otherwise `"<field>: <message>"`.
#[wasm_bindgen]
pub fn validate_plan_entry_json(entry_json: &str) -> String {
    match serde_json::from_str::<NewPlanEntry>(entry_json) {
        Ok(entry) => validate_plan_entry(&entry)
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default(),
        Err(e) => format!("entry: {}", e),
    }
}

/// Convert grams to kilograms rounded to two decimals
#[wasm_bindgen]
pub fn yield_in_kg(grams: f64) -> f64 {
    grams_to_kg(grams)
}
