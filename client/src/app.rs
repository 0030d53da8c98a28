//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
    hooks::use_location,
};
use session::SessionConfig;

use crate::components::status_indicator::StatusIndicator;
use crate::config::ClientConfig;
use crate::pages::{auth_callback::AuthCallbackPage, home::HomePage, login::LoginPage};
use crate::state::auth::{AuthContext, build_controller};
use crate::util::auth::is_login_path;

/// Path worth remembering as the post-sign-in destination, if any.
fn trackable_path(pathname: &str, search: &str) -> Option<String> {
    if pathname.is_empty() || is_login_path(pathname) {
        return None;
    }
    if search.is_empty() || search == "?" {
        Some(pathname.to_owned())
    } else if search.starts_with('?') {
        Some(format!("{pathname}{search}"))
    } else {
        Some(format!("{pathname}?{search}"))
    }
}

/// Root application component.
///
/// Builds the session controller, provides the auth context, and sets up
/// client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    log::debug!("auth service at {}", config.service_url);
    AuthContext::install(build_controller(&config, SessionConfig::default()));

    view! {
        <Title text="Session"/>

        <Router>
            <LocationTracker/>
            <header class="app-header">
                <a class="app-header__home" href="/">"Home"</a>
                <StatusIndicator/>
            </header>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=AuthCallbackPage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Remembers the current route while a user is signed in.
#[component]
fn LocationTracker() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let location = use_location();

    Effect::new(move || {
        let signed_in = auth.state.with(|s| s.initialized && s.user.is_some());
        let pathname = location.pathname.get();
        let search = location.search.get();
        if !signed_in {
            return;
        }
        if let Some(path) = trackable_path(&pathname, &search) {
            auth.track_location(&path);
        }
    });
}
