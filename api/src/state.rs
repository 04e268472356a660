//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.
//! The store is constructed at wiring time and reached only through this
//! state; there is no ambient global registry.

use shared::storage::{InMemoryLatestStore, LatestStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The latest-value metric store.
    store: Arc<dyn LatestStore>,
}

impl AppState {
    /// Creates a new application state with the given store.
    pub fn new(store: Arc<dyn LatestStore>) -> Self {
        Self { store }
    }

    /// Creates a new application state with an in-memory store.
    ///
    /// This is the production configuration as well as the test one; the
    /// store is in-memory by design and holds no history.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self {
            store: Arc::new(InMemoryLatestStore::new()),
        }
    }

    /// Returns a reference to the store.
    #[must_use]
    pub fn store(&self) -> &dyn LatestStore {
        self.store.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
