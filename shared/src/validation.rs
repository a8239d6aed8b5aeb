//! Validation utilities for Greenhouse Harvest Planning
//!
//! Checks applied at the edges before values reach the selector or the plan store.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::NewPlanEntry;

/// A rejected field and the reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn on(field: &'static str) -> impl FnOnce(&'static str) -> FieldError {
        move |message| FieldError { field, message }
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD")
}

/// Validate a harvest yield target (grams)
pub fn validate_target_yield(target_yield_g: f64) -> Result<(), &'static str> {
    if !target_yield_g.is_finite() || target_yield_g <= 0.0 {
        return Err("Target yield must be greater than 0 grams");
    }
    Ok(())
}

/// Validate a model confidence value
pub fn validate_confidence(confidence: f64) -> Result<(), &'static str> {
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1");
    }
    Ok(())
}

/// Validate a predicted or planned yield (grams)
pub fn validate_yield(yield_g: f64) -> Result<(), &'static str> {
    if !yield_g.is_finite() || yield_g < 0.0 {
        return Err("Yield cannot be negative");
    }
    Ok(())
}

/// Validate a crop type name before normalization
pub fn validate_crop_type(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Crop type cannot be empty");
    }
    if name.len() > 50 {
        return Err("Crop type must be at most 50 characters");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '_' || c == '-')
    {
        return Err("Crop type may only contain letters, spaces, '_' and '-'");
    }
    Ok(())
}

/// Validate a plan entry before it is committed
pub fn validate_plan_entry(entry: &NewPlanEntry) -> Result<(), FieldError> {
    validate_crop_type(entry.crop_type.as_str()).map_err(FieldError::on("crop_type"))?;
    validate_yield(entry.planned_yield_g).map_err(FieldError::on("planned_yield_g"))?;
    validate_confidence(entry.confidence_score).map_err(FieldError::on("confidence_score"))?;
    Ok(())
}
