//! Shift model and duration math.
//!
//! This module defines the persisted Shift record and the decimal-hours
//! duration calculation shared by the grid, the validator and the exports.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for locally-created shift ids that have not been confirmed by the
/// store yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Represents a scheduled work shift for one employee on one date.
///
/// Split shifts carry a second working segment; day-off markers are shifts
/// with `is_day_off` set and contribute no hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier. Ids starting with `temp-` exist only locally.
    pub id: String,
    /// The employee this shift belongs to.
    pub employee_id: String,
    /// The calendar date the shift starts on.
    pub date: NaiveDate,
    /// Local start time of the first segment.
    pub start_time: NaiveTime,
    /// Local end time of the first segment. Earlier than `start_time` means
    /// the segment crosses midnight.
    pub end_time: NaiveTime,
    /// Start of the second segment for split shifts.
    #[serde(default)]
    pub second_start_time: Option<NaiveTime>,
    /// End of the second segment for split shifts.
    #[serde(default)]
    pub second_end_time: Option<NaiveTime>,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Marks a rostered day off rather than a working shift.
    #[serde(default)]
    pub is_day_off: bool,
    /// Free-form note attached to this shift.
    #[serde(default)]
    pub notes: Option<String>,
    /// The schedule plan this shift is linked to, once one exists.
    #[serde(default)]
    pub schedule_plan_id: Option<String>,
}

impl Shift {
    /// Returns a fresh local id with the `temp-` prefix.
    pub fn temp_id() -> String {
        format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4())
    }

    /// Returns true if this shift only exists locally.
    pub fn is_temp(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    /// Calculates the worked hours for this shift as a Decimal.
    ///
    /// Each segment contributes `end − start`, rolling over midnight when the
    /// end time is numerically earlier than the start time. The break is
    /// subtracted once. Day-off markers contribute zero hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use rota_engine::models::Shift;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let shift = Shift {
    ///     id: "shift_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ///     start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    ///     second_start_time: None,
    ///     second_end_time: None,
    ///     break_minutes: 30,
    ///     is_day_off: false,
    ///     notes: None,
    ///     schedule_plan_id: None,
    /// };
    /// assert_eq!(shift.worked_hours(), Decimal::new(75, 1)); // 7.5 hours
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        if self.is_day_off {
            return Decimal::ZERO;
        }

        let mut minutes = segment_minutes(self.start_time, self.end_time);
        if let (Some(start), Some(end)) = (self.second_start_time, self.second_end_time) {
            minutes += segment_minutes(start, end);
        }
        minutes -= i64::from(self.break_minutes);

        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }

    /// Returns the moment this shift starts.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Returns the moment the first segment ends, rolled into the next day
    /// for overnight shifts.
    pub fn end_datetime(&self) -> NaiveDateTime {
        let end = self.date.and_time(self.end_time);
        if self.end_time < self.start_time {
            end + chrono::Duration::days(1)
        } else {
            end
        }
    }
}

/// Duration of one segment in minutes, rolling over midnight when needed.
fn segment_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let start_min = i64::from(start.hour()) * 60 + i64::from(start.minute());
    let end_min = i64::from(end.hour()) * 60 + i64::from(end.minute());
    let mut duration = end_min - start_min;
    if duration < 0 {
        duration += 24 * 60;
    }
    duration
}
