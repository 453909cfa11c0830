//! Per-day availability marks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One employee's availability for a single date.
///
/// Only explicitly marked dates carry a record; an absent record means the
/// employee is available. Marks never block an edit, they only surface as
/// violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityDay {
    /// The employee the mark belongs to.
    pub employee_id: String,
    /// The date the mark covers.
    pub date: NaiveDate,
    /// False when the employee asked not to be scheduled on this date.
    pub available: bool,
}
