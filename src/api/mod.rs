//! HTTP API module for the scheduling engine.
//!
//! This module provides the REST endpoints for reading the weekly grid,
//! syncing draft edits, publishing plans and downloading exports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CopyWeekRequest, ExportQuery, SaveDraftRequest, UpdateShiftRequest, WeekQuery};
pub use response::{ApiError, CopyWeekResponse, ScheduleResponse};
pub use state::AppState;
