//! Domain types mirrored from the hosted auth/data service.
//!
//! DESIGN
//! ======
//! These types are deliberately small: the controller only needs session
//! presence, the embedded identity, and the profile row. Provider-specific
//! wire shapes are decoded by the adapter in the `client` crate.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Subscription status assigned to lazily created profiles.
pub const DEFAULT_SUBSCRIPTION_STATUS: &str = "free";

/// Authenticated user identity as issued by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued stable identifier (UUID string).
    pub id: String,
    /// Primary email address, if the provider shared one.
    pub email: Option<String>,
    /// Display name from provider metadata.
    pub full_name: Option<String>,
    /// Avatar image URL from provider metadata.
    pub avatar_url: Option<String>,
}

/// Credential bundle for an authenticated browser instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry in seconds since the Unix epoch, if known.
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// Whether the access token is expired at `now_secs`, with `leeway_secs`
    /// of slack so refreshes happen before the provider starts rejecting it.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64, leeway_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now_secs.saturating_add(leeway_secs))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Application profile row keyed by user id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default = "default_subscription_status")]
    pub subscription_status: String,
    /// Row creation timestamp (ISO 8601), when the service returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_subscription_status() -> String {
    DEFAULT_SUBSCRIPTION_STATUS.to_owned()
}

/// Insert payload for a profile that does not exist yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub subscription_status: String,
}

impl ProfileDraft {
    /// Default profile for `user`, copying whatever metadata is known.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar_url: user.avatar_url.clone(),
            subscription_status: default_subscription_status(),
        }
    }
}

/// Kind of auth state transition delivered by the hosted service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    /// Any transition the controller does not special-case (user updated,
    /// password recovery, initial session replay, ...).
    Other,
}

impl AuthEventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignedIn => "signed_in",
            Self::SignedOut => "signed_out",
            Self::TokenRefreshed => "token_refreshed",
            Self::Other => "other",
        }
    }
}

/// One auth state transition with the session that resulted from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self { kind: AuthEventKind::SignedIn, session: Some(session) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { kind: AuthEventKind::SignedOut, session: None }
    }

    #[must_use]
    pub fn token_refreshed(session: Session) -> Self {
        Self { kind: AuthEventKind::TokenRefreshed, session: Some(session) }
    }
}
