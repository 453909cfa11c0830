//! Weekly grid derivation and display types.

mod derive;
mod types;

pub use derive::{derive_grid, week_dates, weekly_cost};
pub use types::{DailyTotal, DepartmentGroup, GrandTotal, GridCell, GridRow, ScheduleGrid};
