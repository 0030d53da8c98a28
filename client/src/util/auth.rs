//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply identical unauthenticated redirect behavior, and
//! the login page needs to know where to send the user afterwards.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;
use session::SessionState;

pub const LOGIN_PATH: &str = "/login";

/// Whether a protected route should bounce to the login page.
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    state.initialized && !state.loading && state.user.is_none()
}

/// Whether `path` (possibly with query or fragment) is the login page.
pub fn is_login_path(path: &str) -> bool {
    path.strip_prefix(LOGIN_PATH)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['?', '#', '/']))
}

/// Login URL that returns to `current` after sign-in. The root and the login
/// page itself need no `next` parameter.
pub fn login_path_for(current: &str) -> String {
    let current = current.trim();
    if current.is_empty() || current == "/" || is_login_path(current) {
        return LOGIN_PATH.to_owned();
    }
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(current))
}

/// Validate a `next` query value: only same-origin absolute paths are kept.
pub fn sanitize_next(next: Option<&str>) -> Option<String> {
    let next = next?.trim();
    let same_origin = next.starts_with('/') && !next.starts_with("//") && !next.contains("://");
    same_origin.then(|| next.to_owned())
}

/// Redirect to the login page whenever bootstrap has finished and no user is
/// present.
pub fn install_unauth_redirect<F>(auth: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    Effect::new(move || {
        let state = auth.get();
        if should_redirect_unauth(&state) {
            let target = login_path_for(&location.pathname.get_untracked());
            navigate(&target, NavigateOptions::default());
        }
    });
}
