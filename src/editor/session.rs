//! Session-local grid editing with undo/redo.
//!
//! The editor owns the working shift set for one week. Every cell edit is
//! recorded as a [`CellCommand`] holding the full replaced and replacing
//! shift, so undoing the clear of a custom-times cell restores the exact
//! record, not just its template code. Nothing here touches persistence;
//! the lifecycle module consumes [`PendingChanges`] to sync.

use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, VecDeque};

use crate::config::{DAY_OFF_CODE, TemplateRegistry};
use crate::error::{EngineError, EngineResult};
use crate::grid::week_dates;
use crate::models::{SchedulePlan, Shift};

use super::changes::PendingChanges;

/// Maximum number of undoable edits kept; the oldest is dropped beyond this.
pub const UNDO_DEPTH: usize = 20;

/// One reversible cell edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCommand {
    /// Row the edit applies to.
    pub employee_id: String,
    /// Column the edit applies to.
    pub date: NaiveDate,
    /// Cell content before the edit; `None` for a previously empty cell.
    pub previous: Option<Shift>,
    /// Cell content after the edit; `None` for a clear.
    pub next: Option<Shift>,
}

/// Editing session over one week's working shift set.
pub struct GridEditor {
    week_start: NaiveDate,
    dates: [NaiveDate; 7],
    plan: Option<SchedulePlan>,
    working: BTreeMap<(String, NaiveDate), Shift>,
    baseline: BTreeMap<String, Shift>,
    undo_stack: VecDeque<CellCommand>,
    redo_stack: Vec<CellCommand>,
}

impl GridEditor {
    /// Opens an editing session seeded from persisted state.
    ///
    /// When `shifts` holds several records for one (employee, date) pair the
    /// latest wins, matching the grid derivation. The session starts clean:
    /// `is_dirty()` is false until the first edit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWeekStart`] when `week_start` is not a
    /// Monday.
    pub fn new(
        week_start: NaiveDate,
        plan: Option<SchedulePlan>,
        shifts: &[Shift],
    ) -> EngineResult<Self> {
        let dates = week_dates(week_start)?;

        let mut working = BTreeMap::new();
        for shift in shifts {
            if dates.contains(&shift.date) {
                working.insert((shift.employee_id.clone(), shift.date), shift.clone());
            }
        }
        let baseline = working
            .values()
            .map(|s: &Shift| (s.id.clone(), s.clone()))
            .collect();

        Ok(Self {
            week_start,
            dates,
            plan,
            working,
            baseline,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        })
    }

    /// The Monday this session covers.
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// The plan this session is attached to, once one exists.
    pub fn plan(&self) -> Option<&SchedulePlan> {
        self.plan.as_ref()
    }

    /// The current working shift set, in cell order.
    pub fn shifts(&self) -> Vec<Shift> {
        self.working.values().cloned().collect()
    }

    /// Sets or clears a cell from a template code.
    ///
    /// `Some(code)` builds the cell's shift from the template (updating in
    /// place when a persisted shift already occupies the cell); `None` clears
    /// the cell. Records one undoable command and discards any redo history.
    /// Setting a cell to its current content is a no-op and records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TemplateNotFound`] for an unknown code and
    /// [`EngineError::InvalidShift`] when `date` is outside the session week.
    pub fn set_cell_type(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        code: Option<char>,
        templates: &TemplateRegistry,
    ) -> EngineResult<()> {
        if !self.dates.contains(&date) {
            return Err(EngineError::InvalidShift {
                shift_id: format!("{employee_id}@{date}"),
                message: format!("date {date} is outside the week of {}", self.week_start),
            });
        }

        let key = (employee_id.to_string(), date);
        let previous = self.working.get(&key).cloned();

        let next = match code {
            None => None,
            Some(code) => {
                let template = templates.get(code)?;
                let (id, schedule_plan_id, notes) = match &previous {
                    Some(existing) => (
                        existing.id.clone(),
                        existing.schedule_plan_id.clone(),
                        existing.notes.clone(),
                    ),
                    None => (Shift::temp_id(), None, None),
                };
                Some(Shift {
                    id,
                    employee_id: employee_id.to_string(),
                    date,
                    start_time: template.start,
                    end_time: template.end,
                    second_start_time: template.second_start,
                    second_end_time: template.second_end,
                    break_minutes: template.break_minutes,
                    is_day_off: code == DAY_OFF_CODE,
                    notes,
                    schedule_plan_id,
                })
            }
        };

        if previous == next {
            return Ok(());
        }

        self.apply(&key, next.clone());
        self.push_command(CellCommand {
            employee_id: employee_id.to_string(),
            date,
            previous,
            next,
        });
        Ok(())
    }

    /// Reverts the most recent edit. Returns false when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.undo_stack.pop_back() else {
            return false;
        };
        let key = (command.employee_id.clone(), command.date);
        self.apply(&key, command.previous.clone());
        self.redo_stack.push(command);
        true
    }

    /// Re-applies the most recently undone edit. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        let key = (command.employee_id.clone(), command.date);
        self.apply(&key, command.next.clone());
        self.undo_stack.push_back(command);
        true
    }

    /// Number of edits currently undoable.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Diffs the working set against the last-saved baseline.
    ///
    /// Temp-id shifts appear as creates, persisted shifts with changed
    /// content as updates, and persisted shifts missing from the working set
    /// as deletes. Temp ids never reach the delete list.
    pub fn pending_changes(&self) -> PendingChanges {
        let mut changes = PendingChanges::default();

        for shift in self.working.values() {
            if shift.is_temp() {
                changes.to_create.push(shift.clone());
            } else if self.baseline.get(&shift.id) != Some(shift) {
                changes.to_update.push(shift.clone());
            }
        }

        let working_ids: BTreeMap<&str, ()> = self
            .working
            .values()
            .map(|s| (s.id.as_str(), ()))
            .collect();
        for id in self.baseline.keys() {
            if !working_ids.contains_key(id.as_str()) {
                changes.to_delete.push(id.clone());
            }
        }

        changes
    }

    /// Returns true when the working set differs from the saved baseline.
    pub fn is_dirty(&self) -> bool {
        !self.pending_changes().is_empty()
    }

    /// Stages weekday-to-weekday clones of another week's shifts as unsaved
    /// creates.
    ///
    /// Notes are not copied; occupied target cells are replaced. Clears the
    /// undo and redo history, since the bulk staging is not reversible cell
    /// by cell. Returns the number of staged shifts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWeekStart`] when `source_week_start` is
    /// not a Monday.
    pub fn copy_previous_week(
        &mut self,
        source_week_start: NaiveDate,
        source_shifts: &[Shift],
    ) -> EngineResult<usize> {
        let source_dates = week_dates(source_week_start)?;
        let offset = self.week_start - source_week_start;

        let mut staged = 0;
        for source in source_shifts {
            if !source_dates.contains(&source.date) {
                continue;
            }
            let mut clone = source.clone();
            clone.id = Shift::temp_id();
            clone.date = source.date + offset;
            clone.notes = None;
            clone.schedule_plan_id = None;
            self.working
                .insert((clone.employee_id.clone(), clone.date), clone);
            staged += 1;
        }

        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(staged)
    }

    /// Resets the baseline after a successful sync.
    ///
    /// The store-confirmed shifts replace both the baseline and the working
    /// set, so `is_dirty()` is false afterwards. Undo history is discarded:
    /// its commands reference pre-sync ids.
    pub fn mark_saved(&mut self, plan: SchedulePlan, shifts: &[Shift]) {
        self.plan = Some(plan);
        self.working.clear();
        for shift in shifts {
            if self.dates.contains(&shift.date) {
                self.working
                    .insert((shift.employee_id.clone(), shift.date), shift.clone());
            }
        }
        self.baseline = self
            .working
            .values()
            .map(|s| (s.id.clone(), s.clone()))
            .collect();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn apply(&mut self, key: &(String, NaiveDate), value: Option<Shift>) {
        match value {
            Some(shift) => {
                self.working.insert(key.clone(), shift);
            }
            None => {
                self.working.remove(key);
            }
        }
    }

    fn push_command(&mut self, command: CellCommand) {
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }
}

/// Stages weekday-to-weekday clones without an editor session.
///
/// Used by the lifecycle copy operation; behaves like
/// [`GridEditor::copy_previous_week`] but returns the staged shifts directly.
pub fn stage_week_copy(
    source_week_start: NaiveDate,
    target_week_start: NaiveDate,
    source_shifts: &[Shift],
) -> EngineResult<Vec<Shift>> {
    let source_dates = week_dates(source_week_start)?;
    week_dates(target_week_start)?;
    let offset: Duration = target_week_start - source_week_start;

    Ok(source_shifts
        .iter()
        .filter(|s| source_dates.contains(&s.date))
        .map(|source| {
            let mut clone = source.clone();
            clone.id = Shift::temp_id();
            clone.date = source.date + offset;
            clone.notes = None;
            clone.schedule_plan_id = None;
            clone
        })
        .collect())
}
