//! Application state for the scheduling API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::lifecycle::ScheduleStore;

/// Shared application state.
///
/// Contains the loaded scheduling configuration and the backing store,
/// shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn ScheduleStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &crate::config::ScheduleConfig {
        self.config.config()
    }

    /// Returns the backing store.
    pub fn store(&self) -> &dyn ScheduleStore {
        self.store.as_ref()
    }
}
