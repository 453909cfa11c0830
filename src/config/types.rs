//! Configuration types for the scheduling engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files: the shift-template
//! registry, the labor constraints, and the print-sector mapping.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{Role, Shift};

/// Reserved cell code for shifts whose times match no configured template.
pub const CUSTOM_CODE: char = 'X';

/// Template code that marks a rostered day off.
pub const DAY_OFF_CODE: char = 'D';

/// Reserved sector name acting as the identity filter.
pub const ALL_SECTOR: &str = "all";

/// A named, reusable shift pattern identified by a single-letter code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShiftTemplate {
    /// Display name (e.g. "Morning").
    pub label: String,
    /// Start of the first segment.
    pub start: NaiveTime,
    /// End of the first segment.
    pub end: NaiveTime,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Start of the second segment for split templates.
    #[serde(default)]
    pub second_start: Option<NaiveTime>,
    /// End of the second segment for split templates.
    #[serde(default)]
    pub second_end: Option<NaiveTime>,
}

/// Shift-template registry file structure (`templates.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRegistry {
    /// Map of single-character code to template. Kept ordered so template
    /// matching is deterministic.
    pub templates: BTreeMap<char, ShiftTemplate>,
}

impl TemplateRegistry {
    /// Gets a template by its code.
    pub fn get(&self, code: char) -> crate::error::EngineResult<&ShiftTemplate> {
        self.templates
            .get(&code)
            .ok_or(crate::error::EngineError::TemplateNotFound { code })
    }

    /// Resolves the cell code for a shift.
    ///
    /// Day-off shifts always resolve to [`DAY_OFF_CODE`]. Otherwise the first
    /// template (in code order) whose start, end and second segment match the
    /// shift exactly wins; shifts matching nothing resolve to [`CUSTOM_CODE`].
    pub fn match_code(&self, shift: &Shift) -> char {
        if shift.is_day_off {
            return DAY_OFF_CODE;
        }

        self.templates
            .iter()
            .filter(|(code, _)| **code != DAY_OFF_CODE)
            .find(|(_, tpl)| {
                tpl.start == shift.start_time
                    && tpl.end == shift.end_time
                    && tpl.second_start == shift.second_start_time
                    && tpl.second_end == shift.second_end_time
            })
            .map(|(code, _)| *code)
            .unwrap_or(CUSTOM_CODE)
    }
}

/// Labor constraint thresholds (`constraints.yaml`).
///
/// Consumed read-only by the validator and by the overtime-aware cost
/// calculation in the grid derivation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LaborConstraints {
    /// Maximum scheduled hours per employee per week.
    pub max_weekly_hours: Decimal,
    /// Minimum rest between consecutive shifts, in hours.
    pub min_rest_between_shifts: i64,
    /// Minimum full days off per employee per week.
    pub min_days_off_per_week: u32,
    /// Hours at which an approaching-overtime warning is raised.
    pub overtime_warning_threshold: Decimal,
    /// Rate multiplier applied to hours beyond `max_weekly_hours`.
    pub overtime_multiplier: Decimal,
}

/// Print-sector mapping file structure (`sectors.yaml`).
///
/// A sector names a subset of roles used to filter exports (e.g.
/// front-of-house vs. kitchen). The reserved sector [`ALL_SECTOR`] is the
/// identity filter and is never configured.
#[derive(Debug, Clone, Deserialize)]
pub struct SectorMap {
    /// Map of sector name to allowed roles.
    pub sectors: BTreeMap<String, Vec<Role>>,
}

impl SectorMap {
    /// Returns the roles allowed by a sector, or `None` for the identity
    /// sector `all`. An unknown sector yields an empty slice.
    pub fn allowed_roles(&self, sector: &str) -> Option<&[Role]> {
        if sector == ALL_SECTOR {
            return None;
        }
        Some(
            self.sectors
                .get(sector)
                .map(|roles| roles.as_slice())
                .unwrap_or(&[]),
        )
    }
}

/// The complete scheduling configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    templates: TemplateRegistry,
    constraints: LaborConstraints,
    sectors: SectorMap,
}

impl ScheduleConfig {
    /// Creates a ScheduleConfig from its component parts.
    pub fn new(
        templates: TemplateRegistry,
        constraints: LaborConstraints,
        sectors: SectorMap,
    ) -> Self {
        Self {
            templates,
            constraints,
            sectors,
        }
    }

    /// Returns the shift-template registry.
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Returns the labor constraints.
    pub fn constraints(&self) -> &LaborConstraints {
        &self.constraints
    }

    /// Returns the print-sector mapping.
    pub fn sectors(&self) -> &SectorMap {
        &self.sectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn registry() -> TemplateRegistry {
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
            'P',
            ShiftTemplate {
                label: "Split".to_string(),
                start: time(12, 0),
                end: time(16, 0),
                break_minutes: 0,
                second_start: Some(time(19, 0)),
                second_end: Some(time(23, 0)),
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
        TemplateRegistry { templates }
    }

    fn shift(start: NaiveTime, end: NaiveTime) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            start_time: start,
            end_time: end,
            second_start_time: None,
            second_end_time: None,
            break_minutes: 30,
            is_day_off: false,
            notes: None,
            schedule_plan_id: None,
        }
    }

    #[test]
    fn test_exact_match_resolves_template_code() {
        let registry = registry();
        assert_eq!(registry.match_code(&shift(time(9, 0), time(17, 0))), 'M');
    }

    #[test]
    fn test_unmatched_times_resolve_to_custom() {
        let registry = registry();
        assert_eq!(
            registry.match_code(&shift(time(10, 30), time(15, 0))),
            CUSTOM_CODE
        );
    }

    #[test]
    fn test_split_template_requires_second_segment_match() {
        let registry = registry();
        // First segment alone matches P's first segment but not the split.
        assert_eq!(
            registry.match_code(&shift(time(12, 0), time(16, 0))),
            CUSTOM_CODE
        );

        let mut split = shift(time(12, 0), time(16, 0));
        split.second_start_time = Some(time(19, 0));
        split.second_end_time = Some(time(23, 0));
        assert_eq!(registry.match_code(&split), 'P');
    }

    #[test]
    fn test_day_off_flag_wins_over_times() {
        let registry = registry();
        let mut off = shift(time(9, 0), time(17, 0));
        off.is_day_off = true;
        assert_eq!(registry.match_code(&off), DAY_OFF_CODE);
    }

    #[test]
    fn test_get_unknown_template_returns_error() {
        let registry = registry();
        assert!(registry.get('Q').is_err());
        assert!(registry.get('M').is_ok());
    }

    #[test]
    fn test_all_sector_is_identity() {
        let sectors = SectorMap {
            sectors: BTreeMap::from([(
                "kitchen".to_string(),
                vec![Role::Chef, Role::Cook, Role::KitchenPorter],
            )]),
        };
        assert!(sectors.allowed_roles(ALL_SECTOR).is_none());
        assert_eq!(sectors.allowed_roles("kitchen").unwrap().len(), 3);
        assert!(sectors.allowed_roles("spa").unwrap().is_empty());
    }

    #[test]
    fn test_constraints_deserialize_from_yaml() {
        let yaml = r#"
max_weekly_hours: "40"
min_rest_between_shifts: 12
min_days_off_per_week: 1
overtime_warning_threshold: "38"
overtime_multiplier: "1.5"
"#;
        let constraints: LaborConstraints = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(constraints.max_weekly_hours, Decimal::from_str("40").unwrap());
        assert_eq!(constraints.min_rest_between_shifts, 12);
        assert_eq!(
            constraints.overtime_multiplier,
            Decimal::from_str("1.5").unwrap()
        );
    }
}
