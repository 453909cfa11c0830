//! Weekly grid derivation.
//!
//! [`derive_grid`] projects raw shift, leave and employee records into the
//! display grid: one row per active employee, grouped by role, with hour and
//! cost totals at the row, group, day and week level. The projection is pure;
//! callers re-run it after every edit.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::ScheduleConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveSpan, Role, Shift};

use super::types::{DailyTotal, DepartmentGroup, GrandTotal, GridCell, GridRow, ScheduleGrid};

/// Returns the seven dates of the week starting at `week_start`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWeekStart`] when `week_start` is not a
/// Monday.
pub fn week_dates(week_start: NaiveDate) -> EngineResult<[NaiveDate; 7]> {
    if week_start.weekday() != Weekday::Mon {
        return Err(EngineError::InvalidWeekStart { date: week_start });
    }
    Ok(std::array::from_fn(|i| {
        week_start + Duration::days(i as i64)
    }))
}

/// Weekly labor cost for `hours` at `rate`, paying hours beyond the weekly
/// maximum at the overtime multiplier.
pub fn weekly_cost(hours: Decimal, rate: Decimal, config: &ScheduleConfig) -> Decimal {
    let constraints = config.constraints();
    let max = constraints.max_weekly_hours;
    if hours > max {
        max * rate + (hours - max) * rate * constraints.overtime_multiplier
    } else {
        hours * rate
    }
}

/// Derives the full weekly schedule grid.
///
/// Inactive employees are skipped. When several shifts exist for one
/// (employee, date) pair, the latest record in `shifts` wins; earlier ones
/// are ignored entirely, including in the totals. Violation flags start out
/// clear; run the validator's `annotate` to set them.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWeekStart`] when `week_start` is not a
/// Monday.
pub fn derive_grid(
    week_start: NaiveDate,
    employees: &[Employee],
    shifts: &[Shift],
    leave: &[LeaveSpan],
    config: &ScheduleConfig,
) -> EngineResult<ScheduleGrid> {
    let dates = week_dates(week_start)?;

    // Latest record wins per (employee, date).
    let mut by_cell: BTreeMap<(&str, NaiveDate), &Shift> = BTreeMap::new();
    for shift in shifts {
        if dates.contains(&shift.date) {
            by_cell.insert((shift.employee_id.as_str(), shift.date), shift);
        }
    }

    let mut by_role: BTreeMap<Role, Vec<GridRow>> = BTreeMap::new();
    for employee in employees.iter().filter(|e| e.active) {
        let mut cells = BTreeMap::new();
        let mut total_hours = Decimal::ZERO;

        for date in dates {
            let mut cell = GridCell::empty(date);

            if let Some(span) = leave
                .iter()
                .find(|span| span.employee_id == employee.id && span.covers(date))
            {
                cell.is_on_leave = true;
                cell.leave_type = Some(span.leave_type);
            }

            if let Some(shift) = by_cell.get(&(employee.id.as_str(), date)) {
                cell.cell_type = Some(config.templates().match_code(shift));
                total_hours += shift.worked_hours();
                cell.shift = Some((*shift).clone());
            }

            cells.insert(date, cell);
        }

        let total_cost = weekly_cost(total_hours, employee.hourly_rate, config);
        by_role.entry(employee.role).or_default().push(GridRow {
            employee: employee.clone(),
            cells,
            total_hours,
            total_cost,
        });
    }

    let mut groups: Vec<DepartmentGroup> = by_role
        .into_iter()
        .map(|(role, mut rows)| {
            rows.sort_by(|a, b| a.employee.full_name.cmp(&b.employee.full_name));
            let total_hours = rows.iter().map(|r| r.total_hours).sum();
            let total_cost = rows.iter().map(|r| r.total_cost).sum();
            DepartmentGroup {
                role,
                label: role.department_label().to_string(),
                rows,
                total_hours,
                total_cost,
            }
        })
        .collect();
    groups.sort_by_key(|g| g.role.department_order());

    let mut daily_totals: BTreeMap<NaiveDate, DailyTotal> = dates
        .iter()
        .map(|d| {
            (
                *d,
                DailyTotal {
                    hours: Decimal::ZERO,
                    staff: 0,
                },
            )
        })
        .collect();
    let mut grand_hours = Decimal::ZERO;
    let mut grand_cost = Decimal::ZERO;
    let mut scheduled_employees = 0u32;

    for group in &groups {
        grand_cost += group.total_cost;
        for row in &group.rows {
            grand_hours += row.total_hours;
            let mut works = false;
            for cell in row.cells.values() {
                if cell.is_working() {
                    works = true;
                    if let Some(total) = daily_totals.get_mut(&cell.date) {
                        total.staff += 1;
                        if let Some(shift) = &cell.shift {
                            total.hours += shift.worked_hours();
                        }
                    }
                }
            }
            if works {
                scheduled_employees += 1;
            }
        }
    }

    Ok(ScheduleGrid {
        week_start,
        dates: dates.to_vec(),
        groups,
        daily_totals,
        grand_total: GrandTotal {
            hours: grand_hours,
            cost: grand_cost,
            employees: scheduled_employees,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LaborConstraints, SectorMap, ShiftTemplate, TemplateRegistry};
    use crate::models::{LeaveType, Role};
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn config() -> ScheduleConfig {
        let mut templates = BTreeMap::new();
        templates.insert(
            'M',
            ShiftTemplate {
                label: "Morning".to_string(),
                start: time(9, 0),
                end: time(17, 0),
                break_minutes: 30,
                second_start: None,
                second_end: None,
            },
        );
        templates.insert(
            'D',
            ShiftTemplate {
                label: "Day Off".to_string(),
                start: time(0, 0),
                end: time(0, 0),
                break_minutes: 0,
                second_start: None,
                second_end: None,
            },
        );
        ScheduleConfig::new(
            TemplateRegistry { templates },
            LaborConstraints {
                max_weekly_hours: dec("40"),
                min_rest_between_shifts: 12,
                min_days_off_per_week: 1,
                overtime_warning_threshold: dec("38"),
                overtime_multiplier: dec("1.5"),
            },
            SectorMap {
                sectors: BTreeMap::new(),
            },
        )
    }

    fn employee(id: &str, name: &str, role: Role, rate: &str) -> Employee {
        Employee {
            id: id.to_string(),
            full_name: name.to_string(),
            role,
            hourly_rate: dec(rate),
            active: true,
        }
    }

    fn shift(id: &str, employee_id: &str, date: NaiveDate) -> Shift {
        Shift {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date,
            start_time: time(9, 0),
            end_time: time(17, 0),
            second_start_time: None,
            second_end_time: None,
            break_minutes: 30,
            is_day_off: false,
            notes: None,
            schedule_plan_id: None,
        }
    }

    #[test]
    fn test_week_dates_rejects_non_monday() {
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(matches!(
            week_dates(tuesday),
            Err(EngineError::InvalidWeekStart { .. })
        ));
    }

    #[test]
    fn test_week_dates_spans_seven_days() {
        let dates = week_dates(monday()).unwrap();
        assert_eq!(dates[0], monday());
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }

    #[test]
    fn test_derive_grid_places_shift_in_cell() {
        let config = config();
        let employees = vec![employee("emp_001", "Ana Costa", Role::Chef, "18.50")];
        let shifts = vec![shift("shift_001", "emp_001", monday())];

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        let row = grid.row("emp_001").unwrap();
        let cell = &row.cells[&monday()];
        assert_eq!(cell.cell_type, Some('M'));
        assert_eq!(row.total_hours, dec("7.5"));
        assert_eq!(row.total_cost, dec("7.5") * dec("18.50"));
    }

    #[test]
    fn test_latest_shift_wins_for_duplicate_cell() {
        let config = config();
        let employees = vec![employee("emp_001", "Ana Costa", Role::Chef, "18.50")];
        let mut older = shift("shift_001", "emp_001", monday());
        older.start_time = time(7, 0);
        let newer = shift("shift_002", "emp_001", monday());
        let shifts = vec![older, newer];

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        let row = grid.row("emp_001").unwrap();
        let cell = &row.cells[&monday()];
        assert_eq!(cell.shift.as_ref().unwrap().id, "shift_002");
        // Only the surviving record counts towards the totals.
        assert_eq!(row.total_hours, dec("7.5"));
    }

    #[test]
    fn test_inactive_employee_has_no_row() {
        let config = config();
        let mut emp = employee("emp_001", "Ana Costa", Role::Chef, "18.50");
        emp.active = false;

        let grid = derive_grid(monday(), &[emp], &[], &[], &config).unwrap();
        assert!(grid.row("emp_001").is_none());
    }

    #[test]
    fn test_groups_follow_department_order() {
        let config = config();
        let employees = vec![
            employee("emp_001", "Ana Costa", Role::Cleaner, "12.00"),
            employee("emp_002", "Bruno Dias", Role::Manager, "25.00"),
            employee("emp_003", "Carla Melo", Role::Chef, "18.50"),
        ];

        let grid = derive_grid(monday(), &employees, &[], &[], &config).unwrap();
        let roles: Vec<Role> = grid.groups.iter().map(|g| g.role).collect();
        assert_eq!(roles, vec![Role::Manager, Role::Chef, Role::Cleaner]);
    }

    #[test]
    fn test_rows_sorted_by_name_within_group() {
        let config = config();
        let employees = vec![
            employee("emp_001", "Zeca Lima", Role::Chef, "18.50"),
            employee("emp_002", "Ana Costa", Role::Chef, "18.50"),
        ];

        let grid = derive_grid(monday(), &employees, &[], &[], &config).unwrap();
        let names: Vec<&str> = grid.groups[0]
            .rows
            .iter()
            .map(|r| r.employee.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana Costa", "Zeca Lima"]);
    }

    #[test]
    fn test_overtime_hours_cost_multiplied_rate() {
        let config = config();
        let employees = vec![employee("emp_001", "Ana Costa", Role::Chef, "10")];
        // Six 7.5h shifts = 45h: 40 at rate, 5 at 1.5x.
        let shifts: Vec<Shift> = (0..6)
            .map(|i| {
                shift(
                    &format!("shift_{i:03}"),
                    "emp_001",
                    monday() + Duration::days(i),
                )
            })
            .collect();

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        let row = grid.row("emp_001").unwrap();
        assert_eq!(row.total_hours, dec("45"));
        assert_eq!(row.total_cost, dec("400") + dec("75"));
    }

    #[test]
    fn test_day_off_excluded_from_daily_staff_count() {
        let config = config();
        let employees = vec![
            employee("emp_001", "Ana Costa", Role::Chef, "18.50"),
            employee("emp_002", "Bruno Dias", Role::Chef, "16.00"),
        ];
        let mut off = shift("shift_001", "emp_001", monday());
        off.is_day_off = true;
        let shifts = vec![off, shift("shift_002", "emp_002", monday())];

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        let day = &grid.daily_totals[&monday()];
        assert_eq!(day.staff, 1);
        assert_eq!(day.hours, dec("7.5"));
        assert_eq!(grid.grand_total.employees, 1);
    }

    #[test]
    fn test_leave_span_marks_cells() {
        let config = config();
        let employees = vec![employee("emp_001", "Ana Costa", Role::Chef, "18.50")];
        let leave = vec![LeaveSpan {
            employee_id: "emp_001".to_string(),
            start_date: monday(),
            end_date: monday() + Duration::days(2),
            leave_type: LeaveType::Vacation,
        }];

        let grid = derive_grid(monday(), &employees, &[], &leave, &config).unwrap();
        let row = grid.row("emp_001").unwrap();
        assert!(row.cells[&monday()].is_on_leave);
        assert_eq!(
            row.cells[&monday()].leave_type,
            Some(LeaveType::Vacation)
        );
        assert!(row.cells[&(monday() + Duration::days(2))].is_on_leave);
        assert!(!row.cells[&(monday() + Duration::days(3))].is_on_leave);
    }

    #[test]
    fn test_grand_total_matches_sum_of_rows() {
        let config = config();
        let employees = vec![
            employee("emp_001", "Ana Costa", Role::Chef, "18.50"),
            employee("emp_002", "Bruno Dias", Role::Waiter, "14.00"),
        ];
        let shifts = vec![
            shift("shift_001", "emp_001", monday()),
            shift("shift_002", "emp_002", monday()),
            shift("shift_003", "emp_002", monday() + Duration::days(1)),
        ];

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        let row_hours: Decimal = grid.rows().map(|r| r.total_hours).sum();
        let day_hours: Decimal = grid.daily_totals.values().map(|d| d.hours).sum();
        assert_eq!(grid.grand_total.hours, row_hours);
        assert_eq!(grid.grand_total.hours, day_hours);
        assert_eq!(grid.grand_total.employees, 2);
    }

    #[test]
    fn test_shift_outside_week_ignored() {
        let config = config();
        let employees = vec![employee("emp_001", "Ana Costa", Role::Chef, "18.50")];
        let next_monday = monday() + Duration::days(7);
        let shifts = vec![shift("shift_001", "emp_001", next_monday)];

        let grid = derive_grid(monday(), &employees, &shifts, &[], &config).unwrap();
        assert_eq!(grid.grand_total.hours, Decimal::ZERO);
    }
}
