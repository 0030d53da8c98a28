//! # client
//!
//! Leptos + WASM front-end hosting the session lifecycle controller.
//!
//! This crate contains the app shell and routes, the auth context provider,
//! the connection status indicator, and the browser adapters the `session`
//! crate plugs into: the hosted auth/data service client, the `localStorage`
//! location store, and the `window.location` navigator.
//!
//! Browser-only code is gated behind the `csr` feature; without it the
//! adapters compile to inert stubs so pure helpers stay testable natively.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic/console hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let config = config::ClientConfig::from_build_env();
    if console_log::init_with_level(config.log_level).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    leptos::mount::mount_to_body(app::App);
}
