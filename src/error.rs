//! Error types for the scheduling engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving, editing, syncing
//! or exporting a weekly schedule.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the scheduling engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use rota_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration content was structurally valid but semantically wrong.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid {
        /// A description of what made the configuration invalid.
        message: String,
    },

    /// Shift-template code was not found in the registry.
    #[error("Shift template not found: {code}")]
    TemplateNotFound {
        /// The template code that was not found.
        code: char,
    },

    /// A week start date that is not Monday-aligned was supplied.
    #[error("Week start {date} is not a Monday")]
    InvalidWeekStart {
        /// The offending date.
        date: NaiveDate,
    },

    /// A shift was invalid or contained inconsistent data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// No schedule plan exists with the given id.
    #[error("Schedule plan not found: {id}")]
    PlanNotFound {
        /// The plan id that was not found.
        id: String,
    },

    /// A schedule plan already exists for the given week.
    #[error("A schedule plan already exists for week starting {week_start_date}")]
    PlanExists {
        /// The Monday of the week that already has a plan.
        week_start_date: NaiveDate,
    },

    /// The backing store rejected or failed an operation.
    #[error("Store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },

    /// Workbook or document generation failed; no partial artifact exists.
    #[error("Export failed: {message}")]
    ExportError {
        /// A description of the export failure.
        message: String,
    },
}

impl From<rust_xlsxwriter::XlsxError> for EngineError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        EngineError::ExportError {
            message: e.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
