//! Labor-constraint validation.
//!
//! The validator is a read-only pass over a derived grid. It reports
//! violations; it never rejects an edit. The only mutation it offers is
//! [`annotate`], which flips the `has_violation` flag on affected cells.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::LaborConstraints;
use crate::grid::ScheduleGrid;
use crate::models::{AvailabilityDay, Shift};

/// Category of a detected violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Weekly hours exceed, or approach, the configured maximum.
    MaxHours,
    /// Rest between two consecutive shifts is below the minimum.
    MinRest,
    /// Fewer full days off than the configured minimum.
    DaysOff,
    /// A working shift falls inside an approved leave span.
    LeaveConflict,
    /// A working shift falls on a date the employee marked unavailable.
    Unavailable,
    /// A day has no scheduled staff at all.
    Coverage,
}

/// Severity of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Hard constraint breach.
    Error,
    /// Advisory; the schedule can still be published.
    Warning,
}

/// A single detected constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The employee concerned, absent for schedule-wide checks.
    pub employee_id: Option<String>,
    /// Display name of the employee concerned.
    pub employee_name: Option<String>,
    /// What kind of constraint was breached.
    pub kind: ViolationKind,
    /// The offending dates.
    pub dates: Vec<NaiveDate>,
    /// Human-readable description.
    pub message: String,
    /// Whether this blocks nothing (warning) or flags a hard breach (error).
    pub severity: Severity,
}

/// Result of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All detected violations, in check order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns true when no error-severity violation was found.
    pub fn is_valid(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Iterates over error-severity violations.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    /// Iterates over warning-severity violations.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }
}

/// Runs every constraint check against a derived grid.
///
/// `availability` carries per-day marks; shifts landing on a date marked
/// unavailable become errors. Emits at most one overtime violation per
/// employee per week. The pass is deterministic and never fails; an empty
/// grid yields coverage warnings for the uncovered Sunday and nothing else.
pub fn validate(
    grid: &ScheduleGrid,
    constraints: &LaborConstraints,
    availability: &[AvailabilityDay],
) -> ValidationReport {
    let blocked: BTreeSet<(&str, NaiveDate)> = availability
        .iter()
        .filter(|a| !a.available)
        .map(|a| (a.employee_id.as_str(), a.date))
        .collect();

    let mut violations = Vec::new();

    for row in grid.rows() {
        let employee = &row.employee;
        let shifts: Vec<&Shift> = row
            .cells
            .values()
            .filter(|c| c.is_working())
            .filter_map(|c| c.shift.as_ref())
            .collect();

        check_weekly_hours(&mut violations, row.total_hours, employee, &shifts, constraints);
        check_rest_gaps(&mut violations, employee, &shifts, constraints);
        check_days_off(&mut violations, employee, &shifts, constraints);
        check_leave_conflicts(&mut violations, row);
        check_unavailable(&mut violations, row, &blocked);
    }

    check_sunday_coverage(&mut violations, grid);

    ValidationReport { violations }
}

/// Sets `has_violation` on every cell named by the report and clears it
/// everywhere else. Safe to call repeatedly.
pub fn annotate(grid: &mut ScheduleGrid, report: &ValidationReport) {
    for group in &mut grid.groups {
        for row in &mut group.rows {
            for cell in row.cells.values_mut() {
                cell.has_violation = report.violations.iter().any(|v| {
                    v.employee_id.as_deref() == Some(row.employee.id.as_str())
                        && v.dates.contains(&cell.date)
                });
            }
        }
    }
}

fn check_weekly_hours(
    violations: &mut Vec<Violation>,
    total_hours: Decimal,
    employee: &crate::models::Employee,
    shifts: &[&Shift],
    constraints: &LaborConstraints,
) {
    let dates: Vec<NaiveDate> = shifts.iter().map(|s| s.date).collect();
    if total_hours > constraints.max_weekly_hours {
        violations.push(Violation {
            employee_id: Some(employee.id.clone()),
            employee_name: Some(employee.full_name.clone()),
            kind: ViolationKind::MaxHours,
            dates,
            message: format!(
                "{} is scheduled for {total_hours}h, above the weekly maximum of {}h",
                employee.full_name, constraints.max_weekly_hours
            ),
            severity: Severity::Error,
        });
    } else if total_hours > constraints.overtime_warning_threshold {
        violations.push(Violation {
            employee_id: Some(employee.id.clone()),
            employee_name: Some(employee.full_name.clone()),
            kind: ViolationKind::MaxHours,
            dates,
            message: format!(
                "{} is scheduled for {total_hours}h, approaching the weekly maximum of {}h",
                employee.full_name, constraints.max_weekly_hours
            ),
            severity: Severity::Warning,
        });
    }
}

fn check_rest_gaps(
    violations: &mut Vec<Violation>,
    employee: &crate::models::Employee,
    shifts: &[&Shift],
    constraints: &LaborConstraints,
) {
    let mut ordered: Vec<&&Shift> = shifts.iter().collect();
    ordered.sort_by_key(|s| s.start_datetime());

    for pair in ordered.windows(2) {
        let gap = pair[1].start_datetime() - pair[0].end_datetime();
        // A negative gap means the records overlap, which is not a rest
        // violation.
        if gap.num_hours() < 0 {
            continue;
        }
        if gap.num_hours() < constraints.min_rest_between_shifts {
            violations.push(Violation {
                employee_id: Some(employee.id.clone()),
                employee_name: Some(employee.full_name.clone()),
                kind: ViolationKind::MinRest,
                dates: vec![pair[0].date, pair[1].date],
                message: format!(
                    "{} has only {}h of rest before the shift on {}, minimum is {}h",
                    employee.full_name,
                    gap.num_hours(),
                    pair[1].date,
                    constraints.min_rest_between_shifts
                ),
                severity: Severity::Error,
            });
        }
    }
}

fn check_days_off(
    violations: &mut Vec<Violation>,
    employee: &crate::models::Employee,
    shifts: &[&Shift],
    constraints: &LaborConstraints,
) {
    let worked_days: BTreeSet<NaiveDate> = shifts.iter().map(|s| s.date).collect();
    let days_off = 7 - worked_days.len() as u32;
    if days_off < constraints.min_days_off_per_week {
        violations.push(Violation {
            employee_id: Some(employee.id.clone()),
            employee_name: Some(employee.full_name.clone()),
            kind: ViolationKind::DaysOff,
            dates: worked_days.into_iter().collect(),
            message: format!(
                "{} has {days_off} day(s) off, minimum is {}",
                employee.full_name, constraints.min_days_off_per_week
            ),
            severity: Severity::Error,
        });
    }
}

fn check_leave_conflicts(violations: &mut Vec<Violation>, row: &crate::grid::GridRow) {
    for cell in row.cells.values() {
        if cell.is_working() && cell.is_on_leave {
            let label = cell.leave_type.map(|t| t.label()).unwrap_or("leave");
            violations.push(Violation {
                employee_id: Some(row.employee.id.clone()),
                employee_name: Some(row.employee.full_name.clone()),
                kind: ViolationKind::LeaveConflict,
                dates: vec![cell.date],
                message: format!(
                    "{} is scheduled on {} but has approved {label} that day",
                    row.employee.full_name, cell.date
                ),
                severity: Severity::Error,
            });
        }
    }
}

fn check_unavailable(
    violations: &mut Vec<Violation>,
    row: &crate::grid::GridRow,
    blocked: &BTreeSet<(&str, NaiveDate)>,
) {
    for cell in row.cells.values() {
        if cell.is_working() && blocked.contains(&(row.employee.id.as_str(), cell.date)) {
            violations.push(Violation {
                employee_id: Some(row.employee.id.clone()),
                employee_name: Some(row.employee.full_name.clone()),
                kind: ViolationKind::Unavailable,
                dates: vec![cell.date],
                message: format!(
                    "{} is scheduled on {} but is marked unavailable that day",
                    row.employee.full_name, cell.date
                ),
                severity: Severity::Error,
            });
        }
    }
}

fn check_sunday_coverage(violations: &mut Vec<Violation>, grid: &ScheduleGrid) {
    for (date, total) in &grid.daily_totals {
        if date.weekday() == Weekday::Sun && total.staff == 0 {
            violations.push(Violation {
                employee_id: None,
                employee_name: None,
                kind: ViolationKind::Coverage,
                dates: vec![*date],
                message: format!("No staff scheduled on Sunday {date}"),
                severity: Severity::Warning,
            });
        }
    }
}
