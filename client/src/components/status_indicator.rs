//! Compact auth connection indicator for the app header.
//!
//! SYSTEM CONTEXT
//! ==============
//! Surfaces the session controller's health so users can tell a slow
//! bootstrap from a failed one, and offers a manual retry in the latter case.

#[cfg(test)]
#[path = "status_indicator_test.rs"]
mod status_indicator_test;

use leptos::prelude::*;
use session::{ConnectionStatus, SessionState};

use crate::state::auth::AuthContext;

/// Header indicator showing connected / connecting / error with a retry.
#[component]
pub fn StatusIndicator() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let status = move || auth.state.get().connection_status();

    let dot_class = move || status_class(status());
    let label = move || status_label(status());
    let title = move || status_title(&auth.state.get());
    let show_retry = move || auth.state.get().can_retry();

    let on_retry = move |_| {
        log::info!("retrying session restore");
        auth.spawn_restore();
    };

    view! {
        <div class="status-indicator" title=title>
            <span class=dot_class></span>
            <span class="status-indicator__label">{label}</span>
            <Show when=show_retry>
                <button class="status-indicator__retry" on:click=on_retry title="Retry connecting">
                    "Retry"
                </button>
            </Show>
        </div>
    }
}

fn status_class(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "status-indicator__dot status-indicator__dot--connected",
        ConnectionStatus::Connecting => "status-indicator__dot status-indicator__dot--connecting",
        ConnectionStatus::Error => "status-indicator__dot status-indicator__dot--error",
    }
}

fn status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "Connected",
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Error => "Connection error",
    }
}

/// Hover text: the recorded error when there is one.
fn status_title(state: &SessionState) -> String {
    match (state.connection_status(), state.error.as_deref()) {
        (ConnectionStatus::Error, Some(err)) => err.to_owned(),
        (ConnectionStatus::Error, None) => "Not signed in".to_owned(),
        (ConnectionStatus::Connecting, _) => "Checking your session".to_owned(),
        (ConnectionStatus::Connected, _) => match state.user.as_ref().and_then(|u| u.email.as_deref()) {
            Some(email) => format!("Signed in as {email}"),
            None => "Connected".to_owned(),
        },
    }
}
