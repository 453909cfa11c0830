//! Unsaved-change sets.

use serde::{Deserialize, Serialize};

use crate::models::Shift;

/// The set of unsaved edits, ready to be synced to the store.
///
/// Locally-created shifts keep their `temp-` ids until the store confirms
/// them; a shift that was created and then cleared in the same session never
/// appears anywhere in the change set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingChanges {
    /// Shifts that exist only locally.
    #[serde(default)]
    pub to_create: Vec<Shift>,
    /// Persisted shifts whose content changed.
    #[serde(default)]
    pub to_update: Vec<Shift>,
    /// Ids of persisted shifts that were cleared.
    #[serde(default)]
    pub to_delete: Vec<String>,
}

impl PendingChanges {
    /// Returns true when there is nothing to sync.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of staged operations.
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}
