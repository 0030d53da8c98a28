use session::User;

use super::*;

fn user() -> User {
    User {
        id: "u1".to_owned(),
        email: None,
        full_name: None,
        avatar_url: None,
    }
}

#[test]
fn waits_until_bootstrap_settles() {
    assert_eq!(callback_outcome(&SessionState::default()), CallbackOutcome::Wait);
    let loading = SessionState { initialized: true, loading: true, ..SessionState::default() };
    assert_eq!(callback_outcome(&loading), CallbackOutcome::Wait);
}

#[test]
fn waits_for_controller_redirect_in_flight() {
    let state = SessionState {
        user: Some(user()),
        initialized: true,
        pending_redirect: Some("/reports".to_owned()),
        ..SessionState::default()
    };
    assert_eq!(callback_outcome(&state), CallbackOutcome::Wait);
}

#[test]
fn signed_in_without_remembered_location_goes_home() {
    let state = SessionState { user: Some(user()), initialized: true, ..SessionState::default() };
    assert_eq!(callback_outcome(&state), CallbackOutcome::Home);
}

#[test]
fn failure_message_carries_the_error() {
    let state = SessionState {
        initialized: true,
        error: Some("failed to fetch session: service returned 401: access_denied".to_owned()),
        ..SessionState::default()
    };
    assert_eq!(callback_outcome(&state), CallbackOutcome::Login);
    assert_eq!(
        callback_message(&state),
        "Sign-in failed: failed to fetch session: service returned 401: access_denied"
    );
}

#[test]
fn pending_message_while_waiting() {
    assert_eq!(callback_message(&SessionState::default()), "Completing sign-in...");
}
