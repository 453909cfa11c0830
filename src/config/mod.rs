//! Configuration loading and types.
//!
//! Shift templates, labor constraints and print sectors are restaurant-wide
//! settings. They are loaded once and passed into the derivation, validation
//! and export functions as plain parameters, never read from ambient state.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    LaborConstraints, ScheduleConfig, SectorMap, ShiftTemplate, TemplateRegistry, ALL_SECTOR,
    CUSTOM_CODE, DAY_OFF_CODE,
};
