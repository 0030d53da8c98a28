//! Thin wrappers over `window` for navigation, location, and time.
//!
//! Every function degrades to a harmless default outside the browser so
//! callers never need their own `cfg` gates.

use session::Navigator;

/// Current `location.origin` (`https://app.example.com`), empty outside the browser.
pub fn current_origin() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "csr"))]
    {
        String::new()
    }
}

/// Current `location.hash` including the leading `#`, empty when absent.
pub fn current_hash() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "csr"))]
    {
        String::new()
    }
}

/// Drop the fragment from the address bar without reloading, so tokens from
/// the OAuth callback do not linger in history.
pub fn clear_hash() {
    #[cfg(feature = "csr")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let path = window.location().pathname().unwrap_or_default();
        let search = window.location().search().unwrap_or_default();
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&format!("{path}{search}")));
        }
    }
}

/// Full-page navigation to `url`.
///
/// # Errors
///
/// Returns a message when there is no window or the browser rejects the URL.
pub fn assign(url: &str) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
        window
            .location()
            .set_href(url)
            .map_err(|e| format!("navigation rejected: {e:?}"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = url;
        Err("not available outside the browser".to_owned())
    }
}

/// Seconds since the Unix epoch according to the browser clock.
pub fn now_secs() -> i64 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "csr"))]
    {
        0
    }
}

/// [`Navigator`] that performs a real page load.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn assign(&self, path: &str) {
        if let Err(e) = assign(path) {
            log::warn!("redirect to {path} failed: {e}");
        }
    }
}
