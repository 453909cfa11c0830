//! Persistence seam.
//!
//! [`ScheduleStore`] is the only boundary the engine has to the outside
//! world. The engine never assumes anything about what backs it; the bundled
//! [`MemoryStore`] serves tests and the demo server.

use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AvailabilityDay, Employee, LeaveSpan, PlanStatus, SchedulePlan, Shift};

/// Persistence operations the scheduling engine depends on.
///
/// All range queries are inclusive on both ends. Implementations assign real
/// ids on insert; callers pass temp-id shifts in and get the confirmed record
/// back.
pub trait ScheduleStore: Send + Sync {
    /// All employees, active or not.
    fn employees(&self) -> EngineResult<Vec<Employee>>;

    /// The plan covering the given week, if one exists.
    fn plan_for_week(&self, week_start: NaiveDate) -> EngineResult<Option<SchedulePlan>>;

    /// A plan by id.
    fn plan(&self, id: &str) -> EngineResult<Option<SchedulePlan>>;

    /// Persists a new plan.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PlanExists`] when the week already has a plan.
    fn create_plan(&self, plan: SchedulePlan) -> EngineResult<SchedulePlan>;

    /// Updates a plan's status and bumps its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PlanNotFound`] for an unknown id.
    fn set_plan_status(&self, id: &str, status: PlanStatus) -> EngineResult<SchedulePlan>;

    /// All shifts dated within the inclusive range.
    fn shifts_in_range(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<Shift>>;

    /// A single shift by id.
    fn shift(&self, id: &str) -> EngineResult<Option<Shift>>;

    /// Persists a new shift, assigning it a real id.
    fn insert_shift(&self, shift: Shift) -> EngineResult<Shift>;

    /// Replaces a persisted shift.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidShift`] for an unknown id.
    fn update_shift(&self, shift: Shift) -> EngineResult<Shift>;

    /// Removes a persisted shift.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidShift`] for an unknown id.
    fn delete_shift(&self, id: &str) -> EngineResult<()>;

    /// Approved leave spans overlapping the inclusive range.
    fn leave_overlapping(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<LeaveSpan>>;

    /// Dates within the inclusive range that employees marked unavailable.
    fn unavailable_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AvailabilityDay>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    employees: Vec<Employee>,
    plans: BTreeMap<String, SchedulePlan>,
    shifts: BTreeMap<String, Shift>,
    leave: Vec<LeaveSpan>,
    availability: Vec<AvailabilityDay>,
}

/// In-memory [`ScheduleStore`] for tests and the demo server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with employees.
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write().unwrap_or_else(|e| e.into_inner());
            state.employees = employees;
        }
        store
    }

    /// Seeds a leave span.
    pub fn add_leave(&self, span: LeaveSpan) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.leave.push(span);
    }

    /// Seeds a shift with the id it already carries.
    pub fn add_shift(&self, shift: Shift) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.shifts.insert(shift.id.clone(), shift);
    }

    /// Seeds an availability mark.
    pub fn add_availability(&self, mark: AvailabilityDay) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.availability.push(mark);
    }
}

impl ScheduleStore for MemoryStore {
    fn employees(&self) -> EngineResult<Vec<Employee>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.employees.clone())
    }

    fn plan_for_week(&self, week_start: NaiveDate) -> EngineResult<Option<SchedulePlan>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .plans
            .values()
            .find(|p| p.week_start_date == week_start)
            .cloned())
    }

    fn plan(&self, id: &str) -> EngineResult<Option<SchedulePlan>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.plans.get(id).cloned())
    }

    fn create_plan(&self, plan: SchedulePlan) -> EngineResult<SchedulePlan> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state
            .plans
            .values()
            .any(|p| p.week_start_date == plan.week_start_date)
        {
            return Err(EngineError::PlanExists {
                week_start_date: plan.week_start_date,
            });
        }
        state.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    fn set_plan_status(&self, id: &str, status: PlanStatus) -> EngineResult<SchedulePlan> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let plan = state
            .plans
            .get_mut(id)
            .ok_or_else(|| EngineError::PlanNotFound { id: id.to_string() })?;
        plan.status = status;
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    fn shifts_in_range(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<Shift>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .shifts
            .values()
            .filter(|s| s.date >= start && s.date <= end)
            .cloned()
            .collect())
    }

    fn shift(&self, id: &str) -> EngineResult<Option<Shift>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.shifts.get(id).cloned())
    }

    fn insert_shift(&self, mut shift: Shift) -> EngineResult<Shift> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        shift.id = Uuid::new_v4().to_string();
        state.shifts.insert(shift.id.clone(), shift.clone());
        Ok(shift)
    }

    fn update_shift(&self, shift: Shift) -> EngineResult<Shift> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if !state.shifts.contains_key(&shift.id) {
            return Err(EngineError::InvalidShift {
                shift_id: shift.id.clone(),
                message: "shift does not exist".to_string(),
            });
        }
        state.shifts.insert(shift.id.clone(), shift.clone());
        Ok(shift)
    }

    fn delete_shift(&self, id: &str) -> EngineResult<()> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.shifts.remove(id).is_none() {
            return Err(EngineError::InvalidShift {
                shift_id: id.to_string(),
                message: "shift does not exist".to_string(),
            });
        }
        Ok(())
    }

    fn leave_overlapping(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<LeaveSpan>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .leave
            .iter()
            .filter(|span| span.start_date <= end && span.end_date >= start)
            .cloned()
            .collect())
    }

    fn unavailable_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AvailabilityDay>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .availability
            .iter()
            .filter(|a| !a.available && a.date >= start && a.date <= end)
            .cloned()
            .collect())
    }
}
