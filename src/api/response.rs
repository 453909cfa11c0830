//! Response types for the scheduling API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grid::{DailyTotal, DepartmentGroup, GrandTotal};
use crate::models::{SchedulePlan, Shift};
use crate::validation::Violation;

/// Body of `GET /schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Monday of the returned week.
    pub week_start: chrono::NaiveDate,
    /// The seven dates of the week in order.
    pub dates: Vec<chrono::NaiveDate>,
    /// Department groups with rows and cells, violation flags set.
    pub groups: Vec<DepartmentGroup>,
    /// Per-day totals keyed by date.
    pub daily_totals: std::collections::BTreeMap<chrono::NaiveDate, DailyTotal>,
    /// Week-wide totals.
    pub grand_total: GrandTotal,
    /// The plan covering the week, when one exists.
    pub plan: Option<SchedulePlan>,
    /// All detected constraint violations.
    pub violations: Vec<Violation>,
}

/// Body of `POST /schedule/copy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyWeekResponse {
    /// Staged, unsaved shifts with temp ids.
    pub staged: Vec<Shift>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a shift-not-found error response.
    pub fn shift_not_found(id: &str) -> Self {
        Self::new("SHIFT_NOT_FOUND", format!("Shift not found: {id}"))
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {path}"),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {path}: {message}"),
                ),
            },
            EngineError::ConfigInvalid { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::TemplateNotFound { code } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "TEMPLATE_NOT_FOUND",
                    format!("Shift template not found: {code}"),
                    "The template code is not present in the registry",
                ),
            },
            EngineError::InvalidWeekStart { date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_WEEK_START",
                    format!("Week start {date} is not a Monday"),
                    "Weeks run Monday through Sunday",
                ),
            },
            EngineError::InvalidShift { shift_id, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_SHIFT",
                    format!("Invalid shift '{shift_id}': {message}"),
                    "The shift data contains invalid information",
                ),
            },
            EngineError::PlanNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "PLAN_NOT_FOUND",
                    format!("Schedule plan not found: {id}"),
                ),
            },
            EngineError::PlanExists { week_start_date } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    "PLAN_EXISTS",
                    format!("A schedule plan already exists for week starting {week_start_date}"),
                ),
            },
            EngineError::StoreError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORE_ERROR", "Store operation failed", message),
            },
            EngineError::ExportError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
        }
    }
}
