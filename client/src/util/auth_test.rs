use super::*;
use session::User;

fn user() -> User {
    User {
        id: "u1".to_owned(),
        email: Some("alice@example.com".to_owned()),
        full_name: Some("Alice".to_owned()),
        avatar_url: None,
    }
}

#[test]
fn should_redirect_unauth_when_initialized_idle_and_user_missing() {
    let state = SessionState { initialized: true, ..SessionState::default() };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_before_bootstrap_finishes() {
    let state = SessionState::default();
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = SessionState { initialized: true, loading: true, ..SessionState::default() };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    let state = SessionState {
        user: Some(user()),
        initialized: true,
        ..SessionState::default()
    };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn login_path_carries_encoded_next() {
    assert_eq!(login_path_for("/reports/q3"), "/login?next=%2Freports%2Fq3");
}

#[test]
fn login_path_skips_next_for_root_and_login() {
    assert_eq!(login_path_for("/"), "/login");
    assert_eq!(login_path_for(""), "/login");
    assert_eq!(login_path_for("/login"), "/login");
}

#[test]
fn sanitize_next_keeps_same_origin_paths_only() {
    assert_eq!(sanitize_next(Some("/reports")), Some("/reports".to_owned()));
    assert_eq!(sanitize_next(Some("https://evil.example")), None);
    assert_eq!(sanitize_next(Some("//evil.example/x")), None);
    assert_eq!(sanitize_next(Some("reports")), None);
    assert_eq!(sanitize_next(None), None);
}

#[test]
fn login_path_match_is_exact_segment() {
    assert!(is_login_path("/login"));
    assert!(is_login_path("/login?next=%2Freports"));
    assert!(is_login_path("/login/"));
    assert!(!is_login_path("/login-help"));
    assert!(!is_login_path("/logins"));
    assert_eq!(login_path_for("/login-help"), "/login?next=%2Flogin-help");
}
