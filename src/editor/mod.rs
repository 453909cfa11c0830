//! Session-local grid editing: undo/redo and pending-change tracking.

mod changes;
mod session;

pub use changes::PendingChanges;
pub use session::{stage_week_copy, CellCommand, GridEditor, UNDO_DEPTH};
