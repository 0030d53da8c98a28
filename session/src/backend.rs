//! Async seam to the hosted auth/data service.
//!
//! The controller never talks HTTP itself. Browser builds plug in the REST
//! adapter from the `client` crate; tests plug in an in-memory fake.
//! Futures are `?Send` because browser HTTP futures are tied to the JS event
//! loop.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use crate::config::OAuthProvider;
use crate::error::{BackendError, ProfileError};
use crate::events::AuthSubscription;
use crate::types::{ProfileDraft, Session, UserProfile};

/// Result of [`AuthBackend::get_or_create_profile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// A row already existed; nothing was written.
    Found(UserProfile),
    /// No row existed and the draft was inserted.
    Created(UserProfile),
}

impl ProfileOutcome {
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        match self {
            Self::Found(profile) | Self::Created(profile) => profile,
        }
    }

    #[must_use]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[async_trait::async_trait(?Send)]
pub trait AuthBackend {
    /// Current session, or `None` when signed out.
    async fn get_current_session(&self) -> Result<Option<Session>, BackendError>;

    /// Open a stream of auth transitions. Dropping it unsubscribes.
    fn subscribe(&self) -> AuthSubscription;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Hand the browser to `provider`, asking it to come back to `return_path`.
    async fn start_oauth_redirect(&self, provider: OAuthProvider, return_path: &str) -> Result<(), BackendError>;

    /// Profile row for `user_id`. `Ok(None)` means "no rows", which is not a failure.
    async fn query_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError>;

    async fn insert_profile(&self, draft: &ProfileDraft) -> Result<UserProfile, BackendError>;

    /// Fetch the row for `draft.id`, inserting `draft` when absent.
    ///
    /// The default is lookup-then-insert. Backends that support a conditional
    /// insert should override this so two racing callers cannot both insert.
    ///
    /// # Errors
    ///
    /// [`ProfileError::Query`] when the lookup fails for any reason other than
    /// "no rows"; [`ProfileError::Insert`] when the insert is rejected.
    async fn get_or_create_profile(&self, draft: &ProfileDraft) -> Result<ProfileOutcome, ProfileError> {
        if let Some(profile) = self.query_profile(&draft.id).await.map_err(ProfileError::Query)? {
            return Ok(ProfileOutcome::Found(profile));
        }
        self.insert_profile(draft)
            .await
            .map(ProfileOutcome::Created)
            .map_err(ProfileError::Insert)
    }
}
