//! Draft/publish lifecycle operations.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::editor::{stage_week_copy, PendingChanges};
use crate::error::{EngineError, EngineResult};
use crate::grid::week_dates;
use crate::models::{PlanStatus, SchedulePlan, Shift};

use super::store::ScheduleStore;

/// Per-operation outcome of syncing a pending-change set.
///
/// Partial failure is first-class: every failed operation adds an entry to
/// `errors` while the rest of the batch still goes through. Callers must
/// inspect the error list; a non-empty one means the working copy and the
/// store disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Number of shifts created.
    pub created: u32,
    /// Number of shifts updated.
    pub updated: u32,
    /// Number of shifts deleted.
    pub deleted: u32,
    /// One message per failed operation.
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Returns true when every operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a draft save: the plan the shifts are linked to plus the sync
/// report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// The plan covering the saved week.
    pub plan: SchedulePlan,
    /// What happened to each staged operation.
    pub report: SyncReport,
}

/// Syncs a pending-change set to the store as a draft save.
///
/// A plan for the week is created lazily when none exists; an already
/// published plan keeps its status and simply receives the new shifts.
/// Operations are applied individually, so a failing one never blocks the
/// rest; failures are collected in the returned [`SyncReport`].
///
/// # Errors
///
/// Returns an error only when the save cannot start at all: a non-Monday
/// `week_start` or a store failure while resolving the plan.
pub fn save_draft(
    store: &dyn ScheduleStore,
    week_start: NaiveDate,
    pending: &PendingChanges,
) -> EngineResult<SaveOutcome> {
    let dates = week_dates(week_start)?;

    let plan = match store.plan_for_week(week_start)? {
        Some(plan) => plan,
        None => store.create_plan(SchedulePlan::new_draft(week_start))?,
    };

    let mut report = SyncReport::default();

    for shift in &pending.to_create {
        if !dates.contains(&shift.date) {
            report.errors.push(format!(
                "create {}/{}: date outside the week of {week_start}",
                shift.employee_id, shift.date
            ));
            continue;
        }
        let mut shift = shift.clone();
        shift.schedule_plan_id = Some(plan.id.clone());
        match store.insert_shift(shift) {
            Ok(_) => report.created += 1,
            Err(e) => report.errors.push(format!("create failed: {e}")),
        }
    }

    for shift in &pending.to_update {
        let mut shift = shift.clone();
        if shift.schedule_plan_id.is_none() {
            shift.schedule_plan_id = Some(plan.id.clone());
        }
        match store.update_shift(shift) {
            Ok(_) => report.updated += 1,
            Err(e) => report.errors.push(format!("update failed: {e}")),
        }
    }

    for id in &pending.to_delete {
        match store.delete_shift(id) {
            Ok(()) => report.deleted += 1,
            Err(e) => report.errors.push(format!("delete failed: {e}")),
        }
    }

    if !report.is_clean() {
        warn!(
            week_start = %week_start,
            failed = report.errors.len(),
            "draft save completed with per-operation failures"
        );
    }

    // Bump updated_at without touching the status.
    let plan = store.set_plan_status(&plan.id, plan.status)?;

    Ok(SaveOutcome { plan, report })
}

/// Marks a plan as published.
///
/// Publishing an already published plan is a no-op that succeeds. There is no
/// transition back to draft.
///
/// # Errors
///
/// Returns [`EngineError::PlanNotFound`] for an unknown plan id.
pub fn publish(store: &dyn ScheduleStore, plan_id: &str) -> EngineResult<SchedulePlan> {
    let plan = store
        .plan(plan_id)?
        .ok_or_else(|| EngineError::PlanNotFound {
            id: plan_id.to_string(),
        })?;

    if plan.is_published() {
        return Ok(plan);
    }
    store.set_plan_status(plan_id, PlanStatus::Published)
}

/// Stages weekday-to-weekday copies of a persisted week's shifts.
///
/// Nothing is persisted; the returned temp-id shifts are meant to be adopted
/// by an editor session (or a draft save) as pending creates.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWeekStart`] when either week does not start
/// on a Monday.
pub fn copy_previous_week(
    store: &dyn ScheduleStore,
    source_week_start: NaiveDate,
    target_week_start: NaiveDate,
) -> EngineResult<Vec<Shift>> {
    week_dates(target_week_start)?;
    let source_end = source_week_start + Duration::days(6);
    let source_shifts = store.shifts_in_range(source_week_start, source_end)?;
    stage_week_copy(source_week_start, target_week_start, &source_shifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::MemoryStore;
    use chrono::NaiveTime;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn temp_shift(employee_id: &str, date: NaiveDate) -> Shift {
        Shift {
            id: Shift::temp_id(),
            employee_id: employee_id.to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            second_start_time: None,
            second_end_time: None,
            break_minutes: 30,
            is_day_off: false,
            notes: None,
            schedule_plan_id: None,
        }
    }

    #[test]
    fn test_save_draft_creates_plan_lazily() {
        let store = MemoryStore::new();
        let pending = PendingChanges {
            to_create: vec![temp_shift("emp_001", monday())],
            ..Default::default()
        };

        let outcome = save_draft(&store, monday(), &pending).unwrap();
        assert_eq!(outcome.plan.status, PlanStatus::Draft);
        assert_eq!(outcome.report.created, 1);
        assert!(outcome.report.is_clean());

        // Created shifts are linked to the plan and carry real ids.
        let saved = store
            .shifts_in_range(monday(), monday() + Duration::days(6))
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert!(!saved[0].is_temp());
        assert_eq!(saved[0].schedule_plan_id.as_deref(), Some(outcome.plan.id.as_str()));
    }

    #[test]
    fn test_save_draft_reuses_existing_plan() {
        let store = MemoryStore::new();
        let first = save_draft(&store, monday(), &PendingChanges::default()).unwrap();
        let second = save_draft(&store, monday(), &PendingChanges::default()).unwrap();
        assert_eq!(first.plan.id, second.plan.id);
    }

    #[test]
    fn test_save_draft_rejects_non_monday() {
        let store = MemoryStore::new();
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(matches!(
            save_draft(&store, tuesday, &PendingChanges::default()),
            Err(EngineError::InvalidWeekStart { .. })
        ));
    }

    #[test]
    fn test_partial_failure_reports_each_operation() {
        let store = MemoryStore::new();
        let mut bogus_update = temp_shift("emp_001", monday());
        bogus_update.id = "shift_404".to_string();
        let pending = PendingChanges {
            to_create: vec![temp_shift("emp_001", monday())],
            to_update: vec![bogus_update],
            to_delete: vec!["shift_404".to_string()],
        };

        let outcome = save_draft(&store, monday(), &pending).unwrap();
        assert_eq!(outcome.report.created, 1);
        assert_eq!(outcome.report.updated, 0);
        assert_eq!(outcome.report.deleted, 0);
        assert_eq!(outcome.report.errors.len(), 2);
        assert!(!outcome.report.is_clean());
    }

    #[test]
    fn test_create_outside_week_is_reported_not_applied() {
        let store = MemoryStore::new();
        let pending = PendingChanges {
            to_create: vec![temp_shift("emp_001", monday() + Duration::days(7))],
            ..Default::default()
        };

        let outcome = save_draft(&store, monday(), &pending).unwrap();
        assert_eq!(outcome.report.created, 0);
        assert_eq!(outcome.report.errors.len(), 1);
    }

    #[test]
    fn test_save_to_published_plan_keeps_status() {
        let store = MemoryStore::new();
        let outcome = save_draft(&store, monday(), &PendingChanges::default()).unwrap();
        publish(&store, &outcome.plan.id).unwrap();

        let pending = PendingChanges {
            to_create: vec![temp_shift("emp_001", monday())],
            ..Default::default()
        };
        let outcome = save_draft(&store, monday(), &pending).unwrap();
        assert_eq!(outcome.plan.status, PlanStatus::Published);
        assert_eq!(outcome.report.created, 1);
    }

    #[test]
    fn test_publish_is_idempotent() {
        let store = MemoryStore::new();
        let outcome = save_draft(&store, monday(), &PendingChanges::default()).unwrap();

        let published = publish(&store, &outcome.plan.id).unwrap();
        assert!(published.is_published());
        let again = publish(&store, &outcome.plan.id).unwrap();
        assert!(again.is_published());
    }

    #[test]
    fn test_publish_unknown_plan_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            publish(&store, "plan_404"),
            Err(EngineError::PlanNotFound { .. })
        ));
    }

    #[test]
    fn test_copy_previous_week_stages_unsaved_creates() {
        let store = MemoryStore::new();
        let prev_monday = NaiveDate::from_ymd_opt(2024, 5, 27).unwrap();
        let mut source = temp_shift("emp_001", prev_monday + Duration::days(2));
        source.id = "shift_001".to_string();
        source.notes = Some("swap with Rui".to_string());
        store.add_shift(source);

        let staged = copy_previous_week(&store, prev_monday, monday()).unwrap();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].date, monday() + Duration::days(2));
        assert!(staged[0].is_temp());
        assert!(staged[0].notes.is_none());

        // Nothing was persisted in the target week.
        assert!(store
            .shifts_in_range(monday(), monday() + Duration::days(6))
            .unwrap()
            .is_empty());
    }
}
