//! Client configuration baked in at build time.
//!
//! The browser has no process environment, so values are read with
//! `option_env!` when the WASM bundle is compiled:
//!
//! - `AUTH_SERVICE_URL`: hosted service base URL (default local dev stack)
//! - `AUTH_SERVICE_ANON_KEY`: public API key sent as `apikey`
//! - `AUTH_SESSION_KEY`: `localStorage` key for persisted tokens
//! - `AUTH_REFRESH_LEEWAY_SECS`: refresh this long before expiry (default 60)
//! - `CLIENT_LOG_LEVEL`: `error`..`trace` (default `info`)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:54321";
pub const DEFAULT_SESSION_KEY: &str = "session_tokens";
pub const DEFAULT_REFRESH_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub service_url: String,
    pub anon_key: String,
    pub session_key: String,
    pub refresh_leeway_secs: i64,
    pub log_level: log::Level,
}

/// Raw, unparsed configuration values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawConfig<'a> {
    pub service_url: Option<&'a str>,
    pub anon_key: Option<&'a str>,
    pub session_key: Option<&'a str>,
    pub refresh_leeway_secs: Option<&'a str>,
    pub log_level: Option<&'a str>,
}

impl ClientConfig {
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_raw(RawConfig {
            service_url: option_env!("AUTH_SERVICE_URL"),
            anon_key: option_env!("AUTH_SERVICE_ANON_KEY"),
            session_key: option_env!("AUTH_SESSION_KEY"),
            refresh_leeway_secs: option_env!("AUTH_REFRESH_LEEWAY_SECS"),
            log_level: option_env!("CLIENT_LOG_LEVEL"),
        })
    }

    /// Apply defaults and normalization to `raw`. Unparseable values fall
    /// back to their defaults.
    #[must_use]
    pub fn from_raw(raw: RawConfig<'_>) -> Self {
        let service_url = non_empty(raw.service_url)
            .unwrap_or(DEFAULT_SERVICE_URL)
            .trim_end_matches('/')
            .to_owned();
        let anon_key = non_empty(raw.anon_key).unwrap_or_default().to_owned();
        let session_key = non_empty(raw.session_key)
            .unwrap_or(DEFAULT_SESSION_KEY)
            .to_owned();
        let refresh_leeway_secs = parse_leeway(raw.refresh_leeway_secs);
        let log_level = non_empty(raw.log_level)
            .and_then(|v| log::Level::from_str(v).ok())
            .unwrap_or(log::Level::Info);

        Self { service_url, anon_key, session_key, refresh_leeway_secs, log_level }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_leeway(raw: Option<&str>) -> i64 {
    non_empty(raw)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(DEFAULT_REFRESH_LEEWAY_SECS)
}
