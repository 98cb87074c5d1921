//! Shared application state for the web server.

use crate::data::ProductStore;

/// State handed to every handler. Cheap to clone; the store shares one
/// connection behind a mutex.
#[derive(Clone)]
pub struct AppState {
    store: ProductStore,
}

impl AppState {
    pub fn new(store: ProductStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }
}
