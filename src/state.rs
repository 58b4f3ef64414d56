//! Application state shared across handlers

use std::sync::Arc;

use crate::database::store::DocumentStore;

/// Shared application state: the injected document store handle
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
