//! Signed-in landing page showing the user's profile.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::{SessionState, UserProfile};

use crate::state::auth::AuthContext;
use crate::util::auth::install_unauth_redirect;

/// Greeting name: profile name, then user metadata, then the email.
fn display_name(state: &SessionState) -> String {
    let profile_name = state.profile.as_ref().and_then(|p| p.full_name.clone());
    let user_name = state.user.as_ref().and_then(|u| u.full_name.clone());
    let email = state.user.as_ref().and_then(|u| u.email.clone());
    profile_name
        .or(user_name)
        .or(email)
        .unwrap_or_else(|| "there".to_owned())
}

fn plan_label(profile: Option<&UserProfile>) -> String {
    match profile {
        Some(p) => format!("Plan: {}", p.subscription_status),
        None => "Loading profile...".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    install_unauth_redirect(auth.state, use_navigate());

    let busy = RwSignal::new(false);
    let on_sign_out = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let Err(e) = auth.sign_out().await {
                log::warn!("{e}");
            }
            busy.set(false);
        });
    };

    let avatar = move || auth.state.get().profile.and_then(|p| p.avatar_url);

    view! {
        <div class="home-page">
            <Show when=move || auth.state.get().user.is_some()>
                <div class="home-card">
                    <Show when=move || avatar().is_some()>
                        <img class="home-card__avatar" src=move || avatar().unwrap_or_default() alt="" />
                    </Show>
                    <h1>{move || format!("Hello, {}", display_name(&auth.state.get()))}</h1>
                    <p class="home-card__plan">{move || plan_label(auth.state.get().profile.as_ref())}</p>
                    <button class="login-button" on:click=on_sign_out disabled=move || busy.get()>
                        "Sign out"
                    </button>
                </div>
            </Show>
        </div>
    }
}
