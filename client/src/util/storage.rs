//! Browser `localStorage` helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both the remembered location and the persisted session tokens must survive
//! a full-page navigation to the OAuth provider and back, so they live in
//! `localStorage`. Non-`csr` builds read nothing and write nothing.

use serde::Serialize;
use serde::de::DeserializeOwned;
use session::LocationStore;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read the raw string stored under `key`.
pub fn load_raw(key: &str) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        local_storage()?.get_item(key).ok().flatten()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        None
    }
}

/// Store `value` under `key`, logging when the browser refuses (quota,
/// private mode).
pub fn save_raw(key: &str, value: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = local_storage() else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!("localStorage write failed for {key}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (key, value);
    }
}

pub fn remove(key: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
    }
}

/// Load a JSON value from `localStorage` for `key`.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = load_raw(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding unreadable {key}: {e}");
            remove(key);
            None
        }
    }
}

/// Save a JSON value to `localStorage` for `key`.
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => save_raw(key, &raw),
        Err(e) => log::warn!("could not serialize {key}: {e}"),
    }
}

/// [`LocationStore`] backed by `localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocationStore;

impl LocationStore for BrowserLocationStore {
    fn load(&self, key: &str) -> Option<String> {
        load_raw(key)
    }

    fn save(&self, key: &str, value: &str) {
        save_raw(key, value);
    }

    fn remove(&self, key: &str) {
        remove(key);
    }
}
