//! Derived grid types.
//!
//! Everything in this module is a projection of shift, leave and employee
//! records. Nothing here is persisted; the grid is recomputed whenever the
//! underlying data changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Employee, LeaveType, Role, Shift};

/// One (employee, date) cell of the schedule grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// The date this cell covers.
    pub date: NaiveDate,
    /// Resolved shift-template code, or `None` for an empty cell.
    pub cell_type: Option<char>,
    /// The shift backing this cell, if any.
    pub shift: Option<Shift>,
    /// True when an approved leave span covers this date.
    pub is_on_leave: bool,
    /// Category of the covering leave span, when on leave.
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
    /// Set by the validator when this cell participates in a violation.
    pub has_violation: bool,
}

impl GridCell {
    /// Returns an empty cell for the given date.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            cell_type: None,
            shift: None,
            is_on_leave: false,
            leave_type: None,
            has_violation: false,
        }
    }

    /// Returns true if the cell holds a working shift (not empty, not a day
    /// off).
    pub fn is_working(&self) -> bool {
        self.shift.as_ref().is_some_and(|s| !s.is_day_off)
    }
}

/// One employee's week: seven cells plus hour and cost totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    /// The employee this row belongs to.
    pub employee: Employee,
    /// Cells keyed by date, one per day of the week.
    pub cells: BTreeMap<NaiveDate, GridCell>,
    /// Worked hours across the week, in decimal hours.
    pub total_hours: Decimal,
    /// Labor cost for the week, with overtime hours at the multiplied rate.
    pub total_cost: Decimal,
}

/// Rows of one role, with group totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentGroup {
    /// The role shared by every row in the group.
    pub role: Role,
    /// Display label for the group header.
    pub label: String,
    /// Rows sorted by employee name.
    pub rows: Vec<GridRow>,
    /// Sum of row hours.
    pub total_hours: Decimal,
    /// Sum of row costs.
    pub total_cost: Decimal,
}

/// Scheduled hours and headcount for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// Worked hours scheduled on the day.
    pub hours: Decimal,
    /// Number of employees with a working shift on the day.
    pub staff: u32,
}

/// Week-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrandTotal {
    /// Total worked hours across the week.
    pub hours: Decimal,
    /// Total labor cost across the week.
    pub cost: Decimal,
    /// Number of distinct employees with at least one working shift.
    pub employees: u32,
}

/// The fully derived weekly schedule grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleGrid {
    /// The Monday the week starts on.
    pub week_start: NaiveDate,
    /// The seven dates of the week in order.
    pub dates: Vec<NaiveDate>,
    /// Department groups in display order.
    pub groups: Vec<DepartmentGroup>,
    /// Per-day totals keyed by date.
    pub daily_totals: BTreeMap<NaiveDate, DailyTotal>,
    /// Week-wide totals.
    pub grand_total: GrandTotal,
}

impl ScheduleGrid {
    /// Iterates over every row in display order.
    pub fn rows(&self) -> impl Iterator<Item = &GridRow> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    /// Finds a row by employee id.
    pub fn row(&self, employee_id: &str) -> Option<&GridRow> {
        self.rows().find(|r| r.employee.id == employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_has_no_content() {
        let cell = GridCell::empty(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert!(cell.cell_type.is_none());
        assert!(cell.shift.is_none());
        assert!(!cell.is_on_leave);
        assert!(!cell.has_violation);
        assert!(!cell.is_working());
    }

    #[test]
    fn test_grid_cell_serializes_date_keys_as_strings() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut cells = BTreeMap::new();
        cells.insert(date, GridCell::empty(date));

        let json = serde_json::to_string(&cells).unwrap();
        assert!(json.contains("\"2024-06-03\""));
    }
}
