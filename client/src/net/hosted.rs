//! REST adapter for the hosted auth/data service.
//!
//! Client-side (`csr`): real HTTP calls via `gloo-net` against the service's
//! auth (`/auth/v1`) and row (`/rest/v1`) endpoints, with tokens persisted in
//! `localStorage` and auth transitions published on an [`AuthEventHub`].
//! Elsewhere: every call fails with [`BackendError::Unavailable`].
//!
//! SESSION HANDLING
//! ================
//! - Landing on the OAuth callback with tokens in the URL fragment: the first
//!   session fetch exchanges them for the user, persists the session, strips
//!   the fragment, and emits `signed_in`.
//! - Persisted session close to expiry: refreshed with the refresh token and
//!   `token_refreshed` is emitted; a rejected refresh token signs out.
//! - A background timer refreshes shortly before expiry while the tab is open.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures map to `Network`, non-2xx answers to `Status` with the
//! service's own message, malformed bodies to `Decode`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "hosted_test.rs"]
mod hosted_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use session::{
    AuthBackend, AuthEventHub, AuthSubscription, BackendError, OAuthProvider, ProfileDraft, ProfileError,
    ProfileOutcome, Session, UserProfile,
};

use super::types::{CallbackFragment, parse_callback_fragment};
use crate::config::ClientConfig;
use crate::util::{browser, storage};

#[cfg(feature = "csr")]
use super::types::{TokenResponse, WireUser, error_message};
#[cfg(feature = "csr")]
use session::{AuthEvent, User};

#[cfg(any(test, feature = "csr"))]
fn user_url(base: &str) -> String {
    format!("{base}/auth/v1/user")
}

#[cfg(any(test, feature = "csr"))]
fn refresh_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=refresh_token")
}

#[cfg(any(test, feature = "csr"))]
fn logout_url(base: &str) -> String {
    format!("{base}/auth/v1/logout")
}

#[cfg(any(test, feature = "csr"))]
fn authorize_url(base: &str, provider: OAuthProvider, redirect_to: &str) -> String {
    format!(
        "{base}/auth/v1/authorize?provider={}&redirect_to={}",
        provider.as_str(),
        urlencoding::encode(redirect_to)
    )
}

#[cfg(any(test, feature = "csr"))]
fn profile_query_url(base: &str, user_id: &str) -> String {
    format!("{base}/rest/v1/profiles?id=eq.{}&select=*", urlencoding::encode(user_id))
}

#[cfg(any(test, feature = "csr"))]
fn profile_insert_url(base: &str, ignore_duplicates: bool) -> String {
    if ignore_duplicates {
        format!("{base}/rest/v1/profiles?on_conflict=id")
    } else {
        format!("{base}/rest/v1/profiles")
    }
}

#[cfg(any(test, feature = "csr"))]
fn insert_prefer_header(ignore_duplicates: bool) -> &'static str {
    if ignore_duplicates {
        "resolution=ignore-duplicates,return=representation"
    } else {
        "return=representation"
    }
}

/// Never re-arm the refresh timer sooner than this.
#[cfg(any(test, feature = "csr"))]
const MIN_REFRESH_DELAY_SECS: u64 = 10;

/// Longest delay a browser timer accepts (`u32` milliseconds).
#[cfg(any(test, feature = "csr"))]
const MAX_REFRESH_DELAY_SECS: u64 = 4_294_967;

/// Seconds to wait before refreshing a session expiring at `expires_at`.
/// `None` when the session carries no expiry.
///
/// Refreshes `leeway_secs` before expiry; lifetimes shorter than twice the
/// leeway refresh at half-life instead. The result is clamped to
/// [`MIN_REFRESH_DELAY_SECS`]..=[`MAX_REFRESH_DELAY_SECS`].
#[cfg(any(test, feature = "csr"))]
fn refresh_delay_secs(expires_at: Option<i64>, now_secs: i64, leeway_secs: i64) -> Option<u64> {
    let remaining = expires_at?.saturating_sub(now_secs);
    let due = if remaining > leeway_secs.saturating_mul(2) {
        remaining - leeway_secs
    } else {
        remaining / 2
    };
    let due = u64::try_from(due).unwrap_or(0);
    Some(due.clamp(MIN_REFRESH_DELAY_SECS, MAX_REFRESH_DELAY_SECS))
}

/// Rejections of a refresh token that mean "signed out", not "try later".
#[cfg(any(test, feature = "csr"))]
fn is_rejected_credential(err: &BackendError) -> bool {
    matches!(err, BackendError::Status { status, .. } if (400..500).contains(status))
}

/// Hosted auth/data service client implementing [`AuthBackend`].
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
pub struct HostedAuthBackend {
    config: ClientConfig,
    hub: AuthEventHub,
    session: RefCell<Option<Session>>,
    callback: RefCell<CallbackFragment>,
    refresh_generation: Cell<u64>,
    this: Weak<Self>,
}

impl HostedAuthBackend {
    /// Load any persisted session and capture callback tokens from the URL.
    pub fn new(config: ClientConfig) -> Rc<Self> {
        let persisted = storage::load_json::<Session>(&config.session_key);
        let callback = parse_callback_fragment(&browser::current_hash(), browser::now_secs());
        Rc::new_cyclic(|this| Self {
            config,
            hub: AuthEventHub::new(),
            session: RefCell::new(persisted),
            callback: RefCell::new(callback),
            refresh_generation: Cell::new(0),
            this: this.clone(),
        })
    }
}

#[cfg(feature = "csr")]
fn network(err: gloo_net::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

#[cfg(feature = "csr")]
fn decode(err: gloo_net::Error) -> BackendError {
    BackendError::Decode(err.to_string())
}

#[cfg(feature = "csr")]
async fn check(resp: gloo_net::http::Response) -> Result<gloo_net::http::Response, BackendError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(BackendError::Status { status, message: error_message(&body) })
}

#[cfg(feature = "csr")]
impl HostedAuthBackend {
    fn base(&self) -> &str {
        &self.config.service_url
    }

    /// Bearer for row requests: the user's token when signed in, else the anon key.
    fn bearer(&self) -> String {
        let token = self
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone());
        format!("Bearer {token}")
    }

    fn store_session(&self, session: Option<&Session>) {
        match session {
            Some(session) => {
                storage::save_json(&self.config.session_key, session);
                *self.session.borrow_mut() = Some(session.clone());
                self.schedule_refresh(session);
            }
            None => {
                storage::remove(&self.config.session_key);
                *self.session.borrow_mut() = None;
                self.refresh_generation.set(self.refresh_generation.get() + 1);
            }
        }
    }

    fn expire(&self) {
        self.store_session(None);
        self.hub.emit(&AuthEvent::signed_out());
    }

    /// Arm a one-shot timer that refreshes `session` shortly before it
    /// expires. Any earlier timer is superseded.
    fn schedule_refresh(&self, session: &Session) {
        let generation = self.refresh_generation.get() + 1;
        self.refresh_generation.set(generation);
        let Some(delay) = refresh_delay_secs(session.expires_at, browser::now_secs(), self.config.refresh_leeway_secs)
        else {
            return;
        };

        let this = self.this.clone();
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_secs(delay)).await;
            let Some(this) = this.upgrade() else {
                return;
            };
            if this.refresh_generation.get() != generation {
                return;
            }
            let current = this.session.borrow().clone();
            if let Some(current) = current {
                if let Err(e) = this.refresh_or_expire(&current).await {
                    log::warn!("background token refresh failed: {e}");
                }
            }
        });
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, BackendError> {
        let resp = gloo_net::http::Request::get(&user_url(self.base()))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(network)?;
        let resp = check(resp).await?;
        resp.json::<WireUser>().await.map(User::from).map_err(decode)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let resp = gloo_net::http::Request::post(&refresh_url(self.base()))
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let resp = check(resp).await?;
        let token: TokenResponse = resp.json().await.map_err(decode)?;
        Ok(token.into_session(browser::now_secs()))
    }

    async fn refresh_or_expire(&self, session: &Session) -> Result<Option<Session>, BackendError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            log::info!("session expired without a refresh token");
            self.expire();
            return Ok(None);
        };
        match self.refresh(refresh_token).await {
            Ok(fresh) => {
                self.store_session(Some(&fresh));
                self.hub.emit(&AuthEvent::token_refreshed(fresh.clone()));
                Ok(Some(fresh))
            }
            Err(err) if is_rejected_credential(&err) => {
                log::info!("refresh token rejected: {err}");
                self.expire();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn complete_callback(&self) -> Result<Option<Session>, BackendError> {
        let callback = self.callback.replace(CallbackFragment::Empty);
        match callback {
            CallbackFragment::Empty => Ok(None),
            CallbackFragment::Error(message) => {
                browser::clear_hash();
                Err(BackendError::Status { status: 401, message })
            }
            CallbackFragment::Tokens(tokens) => {
                browser::clear_hash();
                let user = self.fetch_user(&tokens.access_token).await?;
                let session = tokens.into_session(user);
                self.store_session(Some(&session));
                self.hub.emit(&AuthEvent::signed_in(session.clone()));
                Ok(Some(session))
            }
        }
    }

    async fn post_profile(&self, draft: &ProfileDraft, ignore_duplicates: bool) -> Result<Vec<UserProfile>, BackendError> {
        let resp = gloo_net::http::Request::post(&profile_insert_url(self.base(), ignore_duplicates))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &self.bearer())
            .header("Prefer", insert_prefer_header(ignore_duplicates))
            .json(draft)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let resp = check(resp).await?;
        resp.json::<Vec<UserProfile>>().await.map_err(decode)
    }
}

#[async_trait::async_trait(?Send)]
impl AuthBackend for HostedAuthBackend {
    async fn get_current_session(&self) -> Result<Option<Session>, BackendError> {
        #[cfg(feature = "csr")]
        {
            if let Some(session) = self.complete_callback().await? {
                return Ok(Some(session));
            }
            let current = self.session.borrow().clone();
            let Some(session) = current else {
                return Ok(None);
            };
            if session.is_expired(browser::now_secs(), self.config.refresh_leeway_secs) {
                return self.refresh_or_expire(&session).await;
            }
            self.schedule_refresh(&session);
            Ok(Some(session))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(BackendError::Unavailable)
        }
    }

    fn subscribe(&self) -> AuthSubscription {
        self.hub.subscribe()
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        #[cfg(feature = "csr")]
        {
            let token = self.session.borrow().as_ref().map(|s| s.access_token.clone());
            if let Some(token) = token {
                let resp = gloo_net::http::Request::post(&logout_url(self.base()))
                    .header("apikey", &self.config.anon_key)
                    .header("Authorization", &format!("Bearer {token}"))
                    .send()
                    .await
                    .map_err(network)?;
                match check(resp).await {
                    Ok(_) => {}
                    Err(err) if is_rejected_credential(&err) => {
                        log::debug!("server-side session already gone: {err}");
                    }
                    Err(err) => return Err(err),
                }
            }
            self.expire();
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(BackendError::Unavailable)
        }
    }

    async fn start_oauth_redirect(&self, provider: OAuthProvider, return_path: &str) -> Result<(), BackendError> {
        #[cfg(feature = "csr")]
        {
            let redirect_to = format!("{}{return_path}", browser::current_origin());
            let url = authorize_url(self.base(), provider, &redirect_to);
            browser::assign(&url).map_err(BackendError::Network)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (provider, return_path);
            Err(BackendError::Unavailable)
        }
    }

    async fn query_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::get(&profile_query_url(self.base(), user_id))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &self.bearer())
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(network)?;
            let resp = check(resp).await?;
            let rows: Vec<UserProfile> = resp.json().await.map_err(decode)?;
            Ok(rows.into_iter().next())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = user_id;
            Err(BackendError::Unavailable)
        }
    }

    async fn insert_profile(&self, draft: &ProfileDraft) -> Result<UserProfile, BackendError> {
        #[cfg(feature = "csr")]
        {
            self.post_profile(draft, false)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| BackendError::Decode("insert returned no row".to_owned()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = draft;
            Err(BackendError::Unavailable)
        }
    }

    /// Lookup first, then a conditional insert that ignores a row created
    /// concurrently (another tab), then a re-read in that case.
    async fn get_or_create_profile(&self, draft: &ProfileDraft) -> Result<ProfileOutcome, ProfileError> {
        if let Some(row) = self.query_profile(&draft.id).await.map_err(ProfileError::Query)? {
            return Ok(ProfileOutcome::Found(row));
        }

        #[cfg(feature = "csr")]
        {
            let rows = self.post_profile(draft, true).await.map_err(ProfileError::Insert)?;
            if let Some(row) = rows.into_iter().next() {
                return Ok(ProfileOutcome::Created(row));
            }
            log::debug!("profile for {} created concurrently; re-reading", draft.id);
            self.query_profile(&draft.id)
                .await
                .map_err(ProfileError::Query)?
                .map(ProfileOutcome::Found)
                .ok_or_else(|| ProfileError::Query(BackendError::Decode("profile missing after insert".to_owned())))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ProfileError::Insert(BackendError::Unavailable))
        }
    }
}
