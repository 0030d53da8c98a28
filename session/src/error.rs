//! Error taxonomy for the session controller and its backend seam.
//!
//! ERROR HANDLING
//! ==============
//! Session-fetch and profile failures are captured into the store and logged;
//! only sign-out and OAuth-request failures reach the caller.

/// Failure reported by a hosted-service call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The operation needs a browser environment.
    #[error("auth service not available in this environment")]
    Unavailable,
}

/// Failure of the combined lookup-or-insert profile operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile lookup failed: {0}")]
    Query(BackendError),
    #[error("profile insert failed: {0}")]
    Insert(BackendError),
}

/// Errors surfaced by the session controller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("failed to fetch session: {0}")]
    SessionFetch(BackendError),
    #[error("failed to load profile: {0}")]
    ProfileQuery(BackendError),
    #[error("failed to create profile: {0}")]
    ProfileInsert(BackendError),
    #[error("sign-out failed: {0}")]
    SignOut(BackendError),
    #[error("sign-in request failed: {0}")]
    OAuthRequest(BackendError),
}

impl From<ProfileError> for SessionError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Query(e) => Self::ProfileQuery(e),
            ProfileError::Insert(e) => Self::ProfileInsert(e),
        }
    }
}
