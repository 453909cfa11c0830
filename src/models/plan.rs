//! Schedule plan model.
//!
//! A schedule plan is the persisted, week-scoped container that carries the
//! draft/published status. At most one plan exists per week start date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility status of a schedule plan.
///
/// Publishing is the only transition that makes a week visible to
/// non-manager staff; there is no automatic transition back to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Visible to managers only.
    Draft,
    /// Visible to all staff.
    Published,
}

/// The persisted container for one week's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// Unique identifier for the plan.
    pub id: String,
    /// The Monday this plan's week starts on.
    pub week_start_date: NaiveDate,
    /// Current visibility status.
    pub status: PlanStatus,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    /// When the plan or its shifts were last modified.
    pub updated_at: DateTime<Utc>,
}

impl SchedulePlan {
    /// Creates a fresh draft plan for the given week.
    pub fn new_draft(week_start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            week_start_date,
            status: PlanStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true once the plan has been published.
    pub fn is_published(&self) -> bool {
        self.status == PlanStatus::Published
    }
}
