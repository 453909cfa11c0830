//! Sector filtering for exports.

use rust_decimal::Decimal;

use crate::config::SectorMap;
use crate::grid::{DailyTotal, GrandTotal, ScheduleGrid};

/// Restricts a grid to the department groups allowed by a sector.
///
/// The reserved sector `all` returns the grid unchanged. An unknown sector
/// allows no roles and yields a grid with no groups and zero totals. Daily
/// and grand totals are re-summed from the surviving rows' precomputed
/// figures so the filtered view stays internally consistent.
pub fn filter_by_sector(grid: &ScheduleGrid, sector: &str, sectors: &SectorMap) -> ScheduleGrid {
    let Some(allowed) = sectors.allowed_roles(sector) else {
        return grid.clone();
    };

    let mut filtered = grid.clone();
    filtered.groups.retain(|g| allowed.contains(&g.role));

    for total in filtered.daily_totals.values_mut() {
        *total = DailyTotal {
            hours: Decimal::ZERO,
            staff: 0,
        };
    }
    let mut grand = GrandTotal {
        hours: Decimal::ZERO,
        cost: Decimal::ZERO,
        employees: 0,
    };

    for group in &filtered.groups {
        grand.cost += group.total_cost;
        for row in &group.rows {
            grand.hours += row.total_hours;
            let mut works = false;
            for cell in row.cells.values() {
                if cell.is_working() {
                    works = true;
                    if let Some(total) = filtered.daily_totals.get_mut(&cell.date) {
                        total.staff += 1;
                        if let Some(shift) = &cell.shift {
                            total.hours += shift.worked_hours();
                        }
                    }
                }
            }
            if works {
                grand.employees += 1;
            }
        }
    }
    filtered.grand_total = grand;
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        LaborConstraints, ScheduleConfig, ShiftTemplate, TemplateRegistry, ALL_SECTOR,
    };
    use crate::grid::derive_grid;
    use crate::models::{Employee, Role, Shift};
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn sectors() -> SectorMap {
        SectorMap {
            sectors: BTreeMap::from([
                ("kitchen".to_string(), vec![Role::Chef, Role::Cook]),
                ("front_of_house".to_string(), vec![Role::Waiter]),
            ]),
        }
    }

    fn grid() -> ScheduleGrid {
        let mut templates = BTreeMap::new();
        templates.insert(
            'M',
            ShiftTemplate {
                label: "Morning".to_string(),
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                break_minutes: 30,
                second_start: None,
                second_end: None,
            },
        );
        let config = ScheduleConfig::new(
            TemplateRegistry { templates },
            LaborConstraints {
                max_weekly_hours: dec("40"),
                min_rest_between_shifts: 12,
                min_days_off_per_week: 1,
                overtime_warning_threshold: dec("38"),
                overtime_multiplier: dec("1.5"),
            },
            sectors(),
        );
        let employees = vec![
            Employee {
                id: "emp_001".to_string(),
                full_name: "Ana Costa".to_string(),
                role: Role::Chef,
                hourly_rate: dec("18.50"),
                active: true,
            },
            Employee {
                id: "emp_002".to_string(),
                full_name: "Bruno Dias".to_string(),
                role: Role::Waiter,
                hourly_rate: dec("14.00"),
                active: true,
            },
        ];
        let shifts = vec![
            Shift {
                id: "shift_001".to_string(),
                employee_id: "emp_001".to_string(),
                date: monday(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                second_start_time: None,
                second_end_time: None,
                break_minutes: 30,
                is_day_off: false,
                notes: None,
                schedule_plan_id: None,
            },
            Shift {
                id: "shift_002".to_string(),
                employee_id: "emp_002".to_string(),
                date: monday(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                second_start_time: None,
                second_end_time: None,
                break_minutes: 30,
                is_day_off: false,
                notes: None,
                schedule_plan_id: None,
            },
        ];
        derive_grid(monday(), &employees, &shifts, &[], &config).unwrap()
    }

    #[test]
    fn test_all_sector_returns_grid_unchanged() {
        let grid = grid();
        let filtered = filter_by_sector(&grid, ALL_SECTOR, &sectors());
        assert_eq!(filtered, grid);
    }

    #[test]
    fn test_sector_keeps_only_allowed_roles() {
        let filtered = filter_by_sector(&grid(), "kitchen", &sectors());
        assert_eq!(filtered.groups.len(), 1);
        assert_eq!(filtered.groups[0].role, Role::Chef);
        assert_eq!(filtered.grand_total.employees, 1);
        assert_eq!(filtered.grand_total.hours, dec("7.5"));
        assert_eq!(filtered.daily_totals[&monday()].staff, 1);
    }

    #[test]
    fn test_unknown_sector_yields_empty_grid() {
        let filtered = filter_by_sector(&grid(), "spa", &sectors());
        assert!(filtered.groups.is_empty());
        assert_eq!(filtered.grand_total.hours, Decimal::ZERO);
        assert_eq!(filtered.grand_total.employees, 0);
    }
}
