use session::User;

use super::*;

fn profile(full_name: Option<&str>) -> UserProfile {
    UserProfile {
        id: "u1".to_owned(),
        email: Some("ada@example.com".to_owned()),
        full_name: full_name.map(str::to_owned),
        avatar_url: None,
        subscription_status: "free".to_owned(),
        created_at: None,
    }
}

fn state_with(user_name: Option<&str>, profile: Option<UserProfile>) -> SessionState {
    SessionState {
        user: Some(User {
            id: "u1".to_owned(),
            email: Some("ada@example.com".to_owned()),
            full_name: user_name.map(str::to_owned),
            avatar_url: None,
        }),
        profile,
        initialized: true,
        ..SessionState::default()
    }
}

#[test]
fn display_name_prefers_profile() {
    let state = state_with(Some("Ada L."), Some(profile(Some("Ada Lovelace"))));
    assert_eq!(display_name(&state), "Ada Lovelace");
}

#[test]
fn display_name_falls_back_to_metadata_then_email() {
    assert_eq!(display_name(&state_with(Some("Ada L."), None)), "Ada L.");
    assert_eq!(display_name(&state_with(None, Some(profile(None)))), "ada@example.com");
    assert_eq!(display_name(&SessionState::default()), "there");
}

#[test]
fn plan_label_reads_subscription_status() {
    assert_eq!(plan_label(Some(&profile(None))), "Plan: free");
    assert_eq!(plan_label(None), "Loading profile...");
}
