//! Request types for the scheduling API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::editor::PendingChanges;
use crate::models::Shift;

/// Query parameters selecting a week.
#[derive(Debug, Clone, Deserialize)]
pub struct WeekQuery {
    /// Monday of the requested week.
    pub week_start: NaiveDate,
}

/// Query parameters for the export endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    /// Monday of the requested week.
    pub week_start: NaiveDate,
    /// Sector filter; defaults to the identity sector `all`.
    #[serde(default = "default_sector")]
    pub sector: String,
    /// When set, the print view renders this single day instead of the week.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

fn default_sector() -> String {
    crate::config::ALL_SECTOR.to_string()
}

/// Body of `POST /schedule/draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    /// Monday of the week being saved.
    pub week_start: NaiveDate,
    /// Shifts to create (temp ids).
    #[serde(default)]
    pub to_create: Vec<Shift>,
    /// Shifts to update.
    #[serde(default)]
    pub to_update: Vec<Shift>,
    /// Ids of shifts to delete.
    #[serde(default)]
    pub to_delete: Vec<String>,
}

impl SaveDraftRequest {
    /// The staged change set carried by this request.
    pub fn pending(&self) -> PendingChanges {
        PendingChanges {
            to_create: self.to_create.clone(),
            to_update: self.to_update.clone(),
            to_delete: self.to_delete.clone(),
        }
    }
}

/// Body of `POST /schedule/copy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyWeekRequest {
    /// Monday of the week to copy from.
    pub source_week_start: NaiveDate,
    /// Monday of the week to copy into.
    pub target_week_start: NaiveDate,
}

/// Body of `PATCH /shifts/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShiftRequest {
    /// New start time of the first segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<chrono::NaiveTime>,
    /// New end time of the first segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<chrono::NaiveTime>,
    /// New start of the second segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_start_time: Option<chrono::NaiveTime>,
    /// New end of the second segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_end_time: Option<chrono::NaiveTime>,
    /// New unpaid break in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    /// New day-off flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_day_off: Option<bool>,
    /// New note text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateShiftRequest {
    /// Applies the present fields onto a shift.
    pub fn apply(&self, shift: &mut Shift) {
        if let Some(start) = self.start_time {
            shift.start_time = start;
        }
        if let Some(end) = self.end_time {
            shift.end_time = end;
        }
        if let Some(start) = self.second_start_time {
            shift.second_start_time = Some(start);
        }
        if let Some(end) = self.second_end_time {
            shift.second_end_time = Some(end);
        }
        if let Some(break_minutes) = self.break_minutes {
            shift.break_minutes = break_minutes;
        }
        if let Some(is_day_off) = self.is_day_off {
            shift.is_day_off = is_day_off;
        }
        if let Some(notes) = &self.notes {
            shift.notes = Some(notes.clone());
        }
    }
}
