//! Controller configuration: fixed routes, storage key, OAuth providers.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_CALLBACK_PATH: &str = "/auth/callback";
pub const DEFAULT_ROOT_PATH: &str = "/";
pub const DEFAULT_LOCATION_KEY: &str = "session_last_location";

/// OAuth identity provider requested from the hosted service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OAuthProvider {
    #[default]
    Google,
}

impl OAuthProvider {
    /// Provider name as the hosted service spells it in `?provider=`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Route the OAuth provider returns to. Never remembered as a location.
    pub callback_path: String,
    /// Application root. Never used as a post-sign-in redirect target.
    pub root_path: String,
    /// Durable storage key holding the last visited path.
    pub location_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            callback_path: DEFAULT_CALLBACK_PATH.to_owned(),
            root_path: DEFAULT_ROOT_PATH.to_owned(),
            location_key: DEFAULT_LOCATION_KEY.to_owned(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn is_callback(&self, path: &str) -> bool {
        normalize_path(path) == normalize_path(&self.callback_path)
    }

    #[must_use]
    pub fn is_root(&self, path: &str) -> bool {
        normalize_path(path) == normalize_path(&self.root_path)
    }

    /// Whether `path` is worth returning to after sign-in.
    #[must_use]
    pub fn is_redirect_target(&self, path: &str) -> bool {
        !path.trim().is_empty() && !self.is_callback(path) && !self.is_root(path)
    }
}

/// Canonical form for path comparisons: query and fragment dropped, trimmed,
/// no trailing slash, `/` for empty.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let path = path.find(['?', '#']).map_or(path, |end| &path[..end]);
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
