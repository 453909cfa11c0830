//! Draft/publish lifecycle and the persistence seam.

mod ops;
mod store;

pub use ops::{copy_previous_week, publish, save_draft, SaveOutcome, SyncReport};
pub use store::{MemoryStore, ScheduleStore};
