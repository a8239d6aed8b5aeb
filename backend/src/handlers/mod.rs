//! HTTP request handlers

pub mod health;
pub mod planning;
pub mod plans;

pub use health::*;
pub use planning::*;
pub use plans::*;

use axum::{extract::rejection::JsonRejection, Json};
use chrono::NaiveDate;
use shared::{parse_iso_date, validate_crop_type, CropType};

use crate::error::{AppError, AppResult};

/// Parse a `YYYY-MM-DD` path or query value
pub(crate) fn parse_date_param(value: &str) -> AppResult<NaiveDate> {
    parse_iso_date(value).map_err(|_| AppError::InvalidDate(value.to_string()))
}

/// Unwrap a JSON body, rendering malformed bodies in the error envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(AppError::from)
}

/// Parse a comma separated list of crop types, ignoring blank items
pub(crate) fn parse_crop_types(value: Option<&str>) -> AppResult<Vec<CropType>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            validate_crop_type(name)
                .map(|_| CropType::new(name))
                .map_err(|msg| AppError::validation("crop_types", msg))
        })
        .collect()
}
