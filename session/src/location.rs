//! Last-visited-path memory that survives the OAuth round-trip.
//!
//! The OAuth flow leaves the application and re-enters on the callback route,
//! so the path has to live in durable client storage rather than in memory.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::SessionConfig;

/// Durable string key-value storage (browser `localStorage` in production).
pub trait LocationStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory [`LocationStore`] for non-browser builds and tests.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryLocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryLocationStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Single-slot memory of the last visited application path.
#[derive(Clone)]
pub struct LocationMemory {
    store: Rc<dyn LocationStore>,
    config: SessionConfig,
}

impl LocationMemory {
    pub fn new(store: Rc<dyn LocationStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Remember `path`. The callback path is ignored so the previous value survives.
    pub fn store(&self, path: &str) {
        if self.config.is_callback(path) {
            return;
        }
        self.store.save(&self.config.location_key, path);
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.store
            .load(&self.config.location_key)
            .filter(|path| !path.trim().is_empty())
    }

    pub fn clear(&self) {
        self.store.remove(&self.config.location_key);
    }
}
