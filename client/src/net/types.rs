//! Wire schema of the hosted auth/data service.
//!
//! DESIGN
//! ======
//! The service's JSON shapes are decoded here and converted into the
//! `session` crate's provider-neutral types, so nothing outside `net` sees
//! `user_metadata` or token-endpoint fields.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use session::{Session, User};

/// User object returned by `GET /auth/v1/user` and token responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Provider-supplied profile claims. Google fills `name`/`picture`, most
/// other providers fill `full_name`/`avatar_url`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        let UserMetadata { full_name, name, avatar_url, picture } = wire.user_metadata;
        Self {
            id: wire.id,
            email: wire.email.filter(|e| !e.is_empty()),
            full_name: full_name.or(name),
            avatar_url: avatar_url.or(picture),
        }
    }
}

/// Body of `POST /auth/v1/token`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: WireUser,
}

impl TokenResponse {
    #[must_use]
    pub fn into_session(self, now_secs: i64) -> Session {
        let expires_at = resolve_expiry(self.expires_at, self.expires_in, now_secs);
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Tokens delivered in the OAuth callback URL fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

impl CallbackTokens {
    #[must_use]
    pub fn into_session(self, user: User) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
            user,
        }
    }
}

/// What the OAuth callback fragment contained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackFragment {
    /// No auth parameters; not a callback landing.
    Empty,
    Tokens(CallbackTokens),
    /// The provider or service refused the sign-in.
    Error(String),
}

/// Parse `#access_token=...&refresh_token=...&expires_in=...` (or the
/// `error`/`error_description` variant).
pub fn parse_callback_fragment(fragment: &str, now_secs: i64) -> CallbackFragment {
    let fragment = fragment.trim_start_matches('#');
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut expires_at = None;
    let mut error = None;
    let mut error_description = None;

    for pair in fragment.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(raw);
        match key {
            "access_token" => access_token = Some(value),
            "refresh_token" => refresh_token = Some(value),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "expires_at" => expires_at = value.parse::<i64>().ok(),
            "error" => error = Some(value),
            "error_description" => error_description = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return CallbackFragment::Error(error_description.unwrap_or(error));
    }
    match access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => CallbackFragment::Tokens(CallbackTokens {
            access_token,
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
            expires_at: resolve_expiry(expires_at, expires_in, now_secs),
        }),
        None => CallbackFragment::Empty,
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |v| v.into_owned())
}

/// Expiry on the local clock. A relative `expires_in` wins over the
/// service's absolute `expires_at`, which is skewed by any clock drift.
fn resolve_expiry(expires_at: Option<i64>, expires_in: Option<i64>, now_secs: i64) -> Option<i64> {
    expires_in.map(|secs| now_secs.saturating_add(secs)).or(expires_at)
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Best human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect())
}
