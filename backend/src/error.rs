//! Error handling for the Greenhouse Harvest Planning server
//!
//! Every error is rendered as `{ "error": { "code", "message", "field"? } }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // Plan store outcomes
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Collaborator errors
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidDate(_) | AppError::Validation { .. } | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateEntry(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CollaboratorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = match &self {
            AppError::InvalidDate(value) => ErrorDetail {
                code: "INVALID_DATE".to_string(),
                message: format!("Invalid date '{}'. Use YYYY-MM-DD", value),
                field: Some("date".to_string()),
            },
            AppError::Validation { field, message } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: message.clone(),
                field: Some(field.clone()),
            },
            AppError::InvalidBody(msg) => ErrorDetail {
                code: "INVALID_BODY".to_string(),
                message: msg.clone(),
                field: None,
            },
            AppError::DuplicateEntry(what) => ErrorDetail {
                code: "DUPLICATE_ENTRY".to_string(),
                message: format!("{} already exists", what),
                field: Some("crop_cycle_id".to_string()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message: format!("{} not found", resource),
                field: None,
            },
            AppError::CollaboratorUnavailable(msg) => ErrorDetail {
                code: "SERVICE_UNAVAILABLE".to_string(),
                message: format!("Dependent service unavailable: {}", msg),
                field: None,
            },
            AppError::DatabaseError(_) => ErrorDetail {
                code: "DATABASE_ERROR".to_string(),
                message: "A database error occurred".to_string(),
                field: None,
            },
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
