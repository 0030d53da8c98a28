use session::{Session, User};

use super::*;

fn signed_in() -> SessionState {
    let user = User {
        id: "u1".to_owned(),
        email: Some("ada@example.com".to_owned()),
        full_name: None,
        avatar_url: None,
    };
    SessionState {
        session: Some(Session {
            access_token: "at".to_owned(),
            refresh_token: None,
            expires_at: None,
            user: user.clone(),
        }),
        user: Some(user),
        initialized: true,
        ..SessionState::default()
    }
}

#[test]
fn class_and_label_follow_status() {
    assert!(status_class(ConnectionStatus::Connected).ends_with("--connected"));
    assert!(status_class(ConnectionStatus::Connecting).ends_with("--connecting"));
    assert!(status_class(ConnectionStatus::Error).ends_with("--error"));
    assert_eq!(status_label(ConnectionStatus::Connecting), "Connecting...");
}

#[test]
fn title_names_the_signed_in_user() {
    assert_eq!(status_title(&signed_in()), "Signed in as ada@example.com");
}

#[test]
fn title_shows_recorded_error() {
    let state = SessionState {
        error: Some("failed to load profile: network error: offline".to_owned()),
        ..signed_in()
    };
    assert_eq!(status_title(&state), "failed to load profile: network error: offline");
}

#[test]
fn title_while_bootstrapping() {
    assert_eq!(status_title(&SessionState::default()), "Checking your session");
}

#[test]
fn title_when_signed_out_without_error() {
    let state = SessionState { initialized: true, ..SessionState::default() };
    assert_eq!(status_title(&state), "Not signed in");
}
