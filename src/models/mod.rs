//! Domain models for the scheduling engine.
//!
//! This module contains the data structures representing employees, shifts,
//! schedule plans and approved leave.

mod availability;
mod employee;
mod leave;
mod plan;
mod shift;

pub use availability::AvailabilityDay;
pub use employee::{Employee, Role};
pub use leave::{LeaveSpan, LeaveType};
pub use plan::{PlanStatus, SchedulePlan};
pub use shift::{Shift, TEMP_ID_PREFIX};
