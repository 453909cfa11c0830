//! HTTP request handlers for the scheduling API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::PendingChanges;
use crate::error::EngineResult;
use crate::export::{
    filter_by_sector, render_print_view, write_document, write_spreadsheet, PrintMode,
};
use crate::grid::{derive_grid, ScheduleGrid};
use crate::lifecycle::{copy_previous_week, publish, save_draft};
use crate::validation::{annotate, validate, ValidationReport};

use super::request::{CopyWeekRequest, ExportQuery, SaveDraftRequest, UpdateShiftRequest, WeekQuery};
use super::response::{ApiError, ApiErrorResponse, CopyWeekResponse, ScheduleResponse};
use super::state::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/schedule", get(get_schedule_handler))
        .route("/schedule/draft", post(save_draft_handler))
        .route("/schedule/copy", post(copy_week_handler))
        .route("/schedule/print", get(print_view_handler))
        .route("/schedule/export.xlsx", get(export_xlsx_handler))
        .route("/schedule/export.pdf", get(export_pdf_handler))
        .route("/schedule-plans/:id/publish", post(publish_handler))
        .route(
            "/shifts/:id",
            axum::routing::patch(update_shift_handler).delete(delete_shift_handler),
        )
        .with_state(state)
}

/// Handler for GET /schedule.
///
/// Returns the derived weekly grid with violation flags, the plan covering
/// the week (or null), and the full violation list.
async fn get_schedule_handler(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        week_start = %query.week_start,
        "Deriving schedule grid"
    );

    match build_schedule(&state, query.week_start) {
        Ok((grid, report)) => {
            info!(
                correlation_id = %correlation_id,
                errors = report.errors().count(),
                warnings = report.warnings().count(),
                "Validation completed"
            );
            let plan = match state.store().plan_for_week(query.week_start) {
                Ok(plan) => plan,
                Err(err) => return engine_error_response(correlation_id, err),
            };
            let body = ScheduleResponse {
                week_start: grid.week_start,
                dates: grid.dates,
                groups: grid.groups,
                daily_totals: grid.daily_totals,
                grand_total: grid.grand_total,
                plan,
                violations: report.violations,
            };
            json_ok(body)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /schedule/draft.
///
/// Applies the staged change set and returns the plan plus a per-operation
/// sync report. Partial failure is still HTTP 200; the report carries the
/// error list.
async fn save_draft_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveDraftRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let pending: PendingChanges = request.pending();
    info!(
        correlation_id = %correlation_id,
        week_start = %request.week_start,
        operations = pending.len(),
        "Saving draft schedule"
    );

    match save_draft(state.store(), request.week_start, &pending) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                plan_id = %outcome.plan.id,
                created = outcome.report.created,
                updated = outcome.report.updated,
                deleted = outcome.report.deleted,
                failed = outcome.report.errors.len(),
                "Draft save completed"
            );
            json_ok(outcome)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /schedule-plans/{id}/publish.
async fn publish_handler(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, plan_id = %plan_id, "Publishing schedule plan");

    match publish(state.store(), &plan_id) {
        Ok(plan) => json_ok(plan),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /schedule/copy.
///
/// Stages weekday-to-weekday copies of the source week. Nothing is
/// persisted; the response carries temp-id shifts for the caller to adopt
/// as pending creates.
async fn copy_week_handler(
    State(state): State<AppState>,
    payload: Result<Json<CopyWeekRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        source = %request.source_week_start,
        target = %request.target_week_start,
        "Copying previous week"
    );

    match copy_previous_week(
        state.store(),
        request.source_week_start,
        request.target_week_start,
    ) {
        Ok(staged) => json_ok(CopyWeekResponse { staged }),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for PATCH /shifts/{id}.
async fn update_shift_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<UpdateShiftRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Updating shift");

    let shift = match state.store().shift(&shift_id) {
        Ok(Some(shift)) => shift,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(ApiError::shift_not_found(&shift_id)))
                .into_response()
        }
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let mut updated = shift;
    request.apply(&mut updated);
    match state.store().update_shift(updated) {
        Ok(shift) => json_ok(shift),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for DELETE /shifts/{id}.
async fn delete_shift_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Deleting shift");

    match state.store().shift(&shift_id) {
        Ok(Some(_)) => match state.store().delete_shift(&shift_id) {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => engine_error_response(correlation_id, err),
        },
        Ok(None) => (StatusCode::NOT_FOUND, Json(ApiError::shift_not_found(&shift_id)))
            .into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /schedule/print.
async fn print_view_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        week_start = %query.week_start,
        sector = %query.sector,
        "Rendering print view"
    );

    match export_grid(&state, &query) {
        Ok(grid) => {
            let mode = match query.date {
                Some(date) => PrintMode::Daily(date),
                None => PrintMode::Weekly,
            };
            let html = render_print_view(&grid, state.config().templates(), mode);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                html,
            )
                .into_response()
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /schedule/export.xlsx.
async fn export_xlsx_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        week_start = %query.week_start,
        sector = %query.sector,
        "Exporting workbook"
    );

    let result = export_grid(&state, &query)
        .and_then(|grid| write_spreadsheet(&grid, state.config().templates()));
    match result {
        Ok(bytes) => binary_response(
            bytes,
            XLSX_CONTENT_TYPE,
            &format!("schedule-{}.xlsx", query.week_start),
        ),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /schedule/export.pdf.
async fn export_pdf_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        week_start = %query.week_start,
        sector = %query.sector,
        "Exporting document"
    );

    let result = export_grid(&state, &query)
        .and_then(|grid| write_document(&grid, state.config().templates()));
    match result {
        Ok(bytes) => binary_response(
            bytes,
            "application/pdf",
            &format!("schedule-{}.pdf", query.week_start),
        ),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Derives the annotated grid plus the validation report for one week.
fn build_schedule(
    state: &AppState,
    week_start: NaiveDate,
) -> EngineResult<(ScheduleGrid, ValidationReport)> {
    let week_end = week_start + Duration::days(6);
    let employees = state.store().employees()?;
    let shifts = state.store().shifts_in_range(week_start, week_end)?;
    let leave = state.store().leave_overlapping(week_start, week_end)?;
    let unavailable = state.store().unavailable_in_range(week_start, week_end)?;

    let mut grid = derive_grid(week_start, &employees, &shifts, &leave, state.config())?;
    let report = validate(&grid, state.config().constraints(), &unavailable);
    annotate(&mut grid, &report);
    Ok((grid, report))
}

/// Derives the sector-filtered grid used by the export endpoints.
fn export_grid(state: &AppState, query: &ExportQuery) -> EngineResult<ScheduleGrid> {
    let (grid, _) = build_schedule(state, query.week_start)?;
    Ok(filter_by_sector(&grid, &query.sector, state.config().sectors()))
}

fn json_ok<T: serde::Serialize>(body: T) -> axum::response::Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn binary_response(bytes: Vec<u8>, content_type: &str, filename: &str) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn engine_error_response(
    correlation_id: Uuid,
    err: crate::error::EngineError,
) -> axum::response::Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Maps a JSON extractor rejection onto the API error shape.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, axum::response::Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response())
        }
    }
}
