//! Approved leave model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a leave span, used in conflict messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid annual leave.
    Vacation,
    /// Sick leave.
    Sick,
    /// Unpaid personal leave.
    Unpaid,
    /// Any other approved absence.
    Other,
}

impl LeaveType {
    /// Returns the label used in violation messages.
    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "vacation",
            LeaveType::Sick => "sick leave",
            LeaveType::Unpaid => "unpaid leave",
            LeaveType::Other => "leave",
        }
    }
}

/// An approved absence covering an inclusive date range.
///
/// Only approved spans are handed to the grid; pending or rejected requests
/// never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveSpan {
    /// The employee on leave.
    pub employee_id: String,
    /// First day of the absence (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the absence (inclusive).
    pub end_date: NaiveDate,
    /// Category of the absence.
    pub leave_type: LeaveType,
}

impl LeaveSpan {
    /// Returns true if the span covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: (i32, u32, u32), end: (i32, u32, u32)) -> LeaveSpan {
        LeaveSpan {
            employee_id: "emp_001".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            leave_type: LeaveType::Vacation,
        }
    }

    #[test]
    fn test_covers_is_inclusive_on_both_ends() {
        let leave = span((2024, 6, 3), (2024, 6, 5));
        assert!(leave.covers(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()));
        assert!(leave.covers(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()));
        assert!(!leave.covers(NaiveDate::from_ymd_opt(2024, 6, 6).unwrap()));
        assert!(!leave.covers(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()));
    }

    #[test]
    fn test_single_day_span() {
        let leave = span((2024, 6, 4), (2024, 6, 4));
        assert!(leave.covers(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()));
        assert!(!leave.covers(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()));
    }

    #[test]
    fn test_leave_type_labels() {
        assert_eq!(LeaveType::Sick.label(), "sick leave");
        assert_eq!(LeaveType::Vacation.label(), "vacation");
    }
}
