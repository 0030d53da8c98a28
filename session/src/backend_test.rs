use futures::executor::block_on;

use super::*;
use crate::test_helpers::{FakeBackend, network_error, profile_for, user};

#[test]
fn get_or_create_returns_existing_row_without_insert() {
    let backend = FakeBackend::new();
    backend.put_profile(profile_for("u1", "pro"));

    let outcome = block_on(backend.get_or_create_profile(&ProfileDraft::for_user(&user("u1")))).expect("outcome");

    assert!(!outcome.was_created());
    assert_eq!(outcome.into_profile().subscription_status, "pro");
    assert_eq!(backend.inserts.get(), 0);
}

#[test]
fn get_or_create_inserts_draft_when_no_rows() {
    let backend = FakeBackend::new();

    let outcome = block_on(backend.get_or_create_profile(&ProfileDraft::for_user(&user("u1")))).expect("outcome");

    assert!(outcome.was_created());
    let profile = outcome.into_profile();
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.subscription_status, "free");
    assert_eq!(backend.inserts.get(), 1);
}

#[test]
fn lookup_failure_maps_to_query_error_and_skips_insert() {
    let backend = FakeBackend::new();
    *backend.query_error.borrow_mut() = Some(network_error());

    let err = block_on(backend.get_or_create_profile(&ProfileDraft::for_user(&user("u1")))).expect_err("should fail");

    assert_eq!(err, ProfileError::Query(network_error()));
    assert_eq!(backend.inserts.get(), 0);
}

#[test]
fn insert_failure_maps_to_insert_error() {
    let backend = FakeBackend::new();
    *backend.insert_error.borrow_mut() = Some(BackendError::Status {
        status: 409,
        message: "duplicate key".to_owned(),
    });

    let err = block_on(backend.get_or_create_profile(&ProfileDraft::for_user(&user("u1")))).expect_err("should fail");

    assert!(matches!(err, ProfileError::Insert(BackendError::Status { status: 409, .. })));
}
