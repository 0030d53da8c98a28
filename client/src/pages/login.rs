//! Login page offering Google sign-in.
//!
//! The optional `next` query parameter names the page to return to once the
//! OAuth round trip completes.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use session::{SessionError, SessionState};

use crate::state::auth::AuthContext;
use crate::util::auth::sanitize_next;

/// Where the user lands after sign-in.
fn return_path_for(next: Option<&str>) -> String {
    sanitize_next(next).unwrap_or_else(|| "/".to_owned())
}

fn sign_in_error_message(err: &SessionError) -> String {
    format!("Could not start Google sign-in: {err}")
}

/// A signed-in visitor has no business on the login page.
fn should_leave_login(state: &SessionState) -> bool {
    state.initialized && !state.loading && state.user.is_some()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let query = use_query_map();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);
    let info = RwSignal::new(String::new());

    Effect::new(move || {
        if should_leave_login(&auth.state.get()) {
            let target = return_path_for(query.get_untracked().get("next").as_deref());
            navigate(&target, NavigateOptions::default());
        }
    });

    let on_google = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Redirecting to Google...".to_owned());
        let return_path = return_path_for(query.get_untracked().get("next").as_deref());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let Err(e) = auth.sign_in_with_google(return_path).await {
                log::warn!("{e}");
                info.set(sign_in_error_message(&e));
                busy.set(false);
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = return_path;
    };

    let session_error = move || auth.state.get().error;

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Welcome"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <button class="login-button login-button--google" on:click=on_google disabled=move || busy.get()>
                    "Continue with Google"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || session_error().is_some()>
                    <p class="login-message login-message--error">{move || session_error().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
