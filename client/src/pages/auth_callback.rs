//! OAuth callback landing page.
//!
//! The hosted backend consumes the tokens in the URL fragment during the
//! controller's bootstrap; this page only waits for that to settle and then
//! gets out of the way. When the controller has already issued the
//! return-to-last-location redirect, the page keeps waiting for it.

#[cfg(test)]
#[path = "auth_callback_test.rs"]
mod auth_callback_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::SessionState;

use crate::state::auth::AuthContext;
use crate::util::auth::LOGIN_PATH;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CallbackOutcome {
    Wait,
    Home,
    Login,
}

fn callback_outcome(state: &SessionState) -> CallbackOutcome {
    if !state.initialized || state.loading {
        return CallbackOutcome::Wait;
    }
    match (&state.user, &state.pending_redirect) {
        (Some(_), Some(_)) => CallbackOutcome::Wait,
        (Some(_), None) => CallbackOutcome::Home,
        (None, _) => CallbackOutcome::Login,
    }
}

fn callback_message(state: &SessionState) -> String {
    match (callback_outcome(state), state.error.as_deref()) {
        (CallbackOutcome::Login, Some(err)) => format!("Sign-in failed: {err}"),
        (CallbackOutcome::Login, None) => "Sign-in was not completed.".to_owned(),
        _ => "Completing sign-in...".to_owned(),
    }
}

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let navigate = use_navigate();

    Effect::new(move || match callback_outcome(&auth.state.get()) {
        CallbackOutcome::Wait => {}
        CallbackOutcome::Home => navigate("/", NavigateOptions::default()),
        CallbackOutcome::Login => {
            // A recorded error keeps the user here so it stays visible.
            if auth.state.get_untracked().error.is_none() {
                navigate(LOGIN_PATH, NavigateOptions::default());
            }
        }
    });

    let failed = move || callback_outcome(&auth.state.get()) == CallbackOutcome::Login;

    view! {
        <div class="login-page">
            <div class="login-card">
                <p class="login-message">{move || callback_message(&auth.state.get())}</p>
                <Show when=failed>
                    <a class="login-button" href=LOGIN_PATH>"Back to sign in"</a>
                </Show>
            </div>
        </div>
    }
}
