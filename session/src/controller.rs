//! Session lifecycle controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! One controller exists per mounted application shell. It owns the session
//! store, runs the bootstrap sequence once, keeps a single auth-event
//! subscription alive until teardown, resolves (or lazily creates) the
//! profile row for the signed-in identity, and remembers the last visited
//! path across the OAuth round-trip.
//!
//! CONCURRENCY
//! ===========
//! Everything runs on one thread. Shared state sits behind `Rc` with
//! interior mutability and no borrow is held across an `.await`. Two
//! counters fence results that complete late:
//! - `identity_epoch` is bumped whenever the mirrored identity changes; a
//!   profile resolution only commits if the epoch and identity still match.
//! - `event_seq` is bumped per processed auth event; a session fetch started
//!   before a newer event was processed is not mirrored over it.
//!
//! Post-sign-in redirects are issued right after the store commit has been
//! delivered to every watcher, not after a timer.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::StreamExt;
use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};

use crate::backend::AuthBackend;
use crate::config::{OAuthProvider, SessionConfig};
use crate::error::SessionError;
use crate::events::AuthSubscription;
use crate::location::{LocationMemory, LocationStore};
use crate::state::SessionState;
use crate::types::{AuthEvent, AuthEventKind, ProfileDraft, Session, User};

/// Full-page browser navigation.
pub trait Navigator {
    fn assign(&self, path: &str);
}

type Watcher = Rc<dyn Fn(&SessionState)>;

struct Inner {
    backend: Rc<dyn AuthBackend>,
    navigator: Rc<dyn Navigator>,
    locations: LocationMemory,
    config: SessionConfig,
    state: RefCell<SessionState>,
    watchers: RefCell<Vec<(u64, Watcher)>>,
    next_watcher_id: Cell<u64>,
    identity_epoch: Cell<u64>,
    event_seq: Cell<u64>,
    bootstrapped: Cell<bool>,
    redirect_issued: Cell<bool>,
    /// `(identity_epoch, user_id)` of the profile resolution currently awaiting the backend.
    profile_in_flight: RefCell<Option<(u64, String)>>,
}

/// Marks a profile resolution as in flight; clears the mark on drop unless a
/// newer resolution has replaced it.
struct InFlightProfile<'a> {
    slot: &'a RefCell<Option<(u64, String)>>,
    key: (u64, String),
}

impl Drop for InFlightProfile<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.borrow_mut();
        if slot.as_ref() == Some(&self.key) {
            *slot = None;
        }
    }
}

/// Cheap-clone handle to the session store and its lifecycle.
#[derive(Clone)]
pub struct SessionController {
    inner: Rc<Inner>,
}

/// Teardown handle returned by [`SessionController::activate`].
///
/// Aborting (explicitly or by drop) stops the driver future, which drops the
/// auth subscription it owns.
pub struct Activation {
    abort: AbortHandle,
}

impl Activation {
    pub fn teardown(&self) {
        self.abort.abort();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.abort.is_aborted()
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

impl SessionController {
    pub fn new(
        backend: Rc<dyn AuthBackend>,
        store: Rc<dyn LocationStore>,
        navigator: Rc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                backend,
                navigator,
                locations: LocationMemory::new(store, config.clone()),
                config,
                state: RefCell::new(SessionState::default()),
                watchers: RefCell::new(Vec::new()),
                next_watcher_id: Cell::new(0),
                identity_epoch: Cell::new(0),
                event_seq: Cell::new(0),
                bootstrapped: Cell::new(false),
                redirect_issued: Cell::new(false),
                profile_in_flight: RefCell::new(None),
            }),
        }
    }

    // =========================================================================
    // Store access
    // =========================================================================

    /// Snapshot of the current store.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn locations(&self) -> &LocationMemory {
        &self.inner.locations
    }

    /// Register `watcher` to receive every committed snapshot. Returns an id
    /// for [`Self::unwatch`].
    pub fn watch(&self, watcher: impl Fn(&SessionState) + 'static) -> u64 {
        let id = self.inner.next_watcher_id.get();
        self.inner.next_watcher_id.set(id + 1);
        self.inner.watchers.borrow_mut().push((id, Rc::new(watcher)));
        id
    }

    pub fn unwatch(&self, id: u64) {
        self.inner.watchers.borrow_mut().retain(|(watcher_id, _)| *watcher_id != id);
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            apply(&mut state);
            state.clone()
        };
        let watchers: Vec<Watcher> = self
            .inner
            .watchers
            .borrow()
            .iter()
            .map(|(_, watcher)| Rc::clone(watcher))
            .collect();
        for watcher in watchers {
            watcher(&snapshot);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Subscribe to auth events and build the driver that bootstraps and then
    /// listens until torn down. The subscription is taken before the bootstrap
    /// fetch so no transition can slip between the two.
    pub fn activate(&self) -> (Activation, LocalBoxFuture<'static, ()>) {
        let (abort, registration) = AbortHandle::new_pair();
        let subscription = self.inner.backend.subscribe();
        let controller = self.clone();
        let driver = async move {
            futures::join!(controller.bootstrap(), controller.listen(subscription));
        };
        let driver = Abortable::new(driver, registration)
            .map(|outcome| {
                if outcome.is_err() {
                    log::debug!("session controller torn down");
                }
            })
            .boxed_local();
        (Activation { abort }, driver)
    }

    /// Establish the initial session state. Runs at most once per controller.
    pub async fn bootstrap(&self) {
        if self.inner.bootstrapped.replace(true) {
            log::debug!("bootstrap already ran; ignoring");
            return;
        }

        let seq = self.inner.event_seq.get();
        self.update(|state| state.loading = true);

        match self.inner.backend.get_current_session().await {
            Ok(session) if self.inner.event_seq.get() == seq => {
                self.apply_session(session).await;
            }
            Ok(_) => log::debug!("auth event arrived during bootstrap; keeping newer state"),
            Err(err) => {
                let err = SessionError::SessionFetch(err);
                log::warn!("{err}");
                self.update(|state| state.error = Some(err.to_string()));
            }
        }

        self.update(|state| {
            state.loading = false;
            state.initialized = true;
        });
    }

    /// Process events from `subscription` in delivery order until the stream
    /// ends. The subscription is released when this returns or is dropped.
    pub async fn listen(&self, mut subscription: AuthSubscription) {
        while let Some(event) = subscription.next().await {
            self.handle_event(event).await;
        }
        log::debug!("auth event stream closed");
    }

    /// Mirror one auth transition into the store and run its side effects.
    pub async fn handle_event(&self, event: AuthEvent) {
        let AuthEvent { kind, session } = event;
        log::debug!("auth event: {}", kind.as_str());

        self.inner.event_seq.set(self.inner.event_seq.get() + 1);
        let user = session.as_ref().map(|s| s.user.clone());
        self.mirror_session(session, true);

        match kind {
            AuthEventKind::SignedIn => self.redirect_to_last_location(),
            AuthEventKind::SignedOut => {
                self.inner.locations.clear();
                self.inner.redirect_issued.set(false);
                self.update(|state| state.pending_redirect = None);
            }
            AuthEventKind::TokenRefreshed | AuthEventKind::Other => {}
        }

        if let Some(user) = user {
            self.resolve_profile(&user).await;
        }
    }

    async fn apply_session(&self, session: Option<Session>) {
        let user = session.as_ref().map(|s| s.user.clone());
        self.mirror_session(session, false);
        if let Some(user) = user {
            self.resolve_profile(&user).await;
        }
    }

    fn mirror_session(&self, session: Option<Session>, clear_loading: bool) {
        let next_id = session.as_ref().map(|s| s.user.id.clone());
        let changed = self.inner.state.borrow().user_id() != next_id.as_deref();
        if changed {
            self.inner.identity_epoch.set(self.inner.identity_epoch.get() + 1);
        }

        self.update(|state| {
            state.user = session.as_ref().map(|s| s.user.clone());
            state.session = session;
            if changed || state.user.is_none() {
                state.profile = None;
            }
            state.error = None;
            if clear_loading {
                state.loading = false;
            }
        });
    }

    fn redirect_to_last_location(&self) {
        if self.inner.redirect_issued.get() {
            return;
        }
        let Some(path) = self.inner.locations.get() else {
            return;
        };
        if !self.inner.config.is_redirect_target(&path) {
            return;
        }

        self.inner.redirect_issued.set(true);
        self.update(|state| state.pending_redirect = Some(path.clone()));
        log::info!("returning to {path} after sign-in");
        self.inner.navigator.assign(&path);
    }

    // =========================================================================
    // Profile resolution
    // =========================================================================

    /// Load the profile row for `user`, creating a default one when absent.
    ///
    /// Failures are logged and recorded in `state.error`; results that land
    /// after the identity has changed are discarded. A call for the identity
    /// whose resolution is already awaiting the backend returns immediately.
    pub async fn resolve_profile(&self, user: &User) {
        let epoch = self.inner.identity_epoch.get();
        let key = (epoch, user.id.clone());
        if self.inner.profile_in_flight.borrow().as_ref() == Some(&key) {
            log::debug!("profile for {} already resolving", user.id);
            return;
        }
        *self.inner.profile_in_flight.borrow_mut() = Some(key.clone());
        let in_flight = InFlightProfile { slot: &self.inner.profile_in_flight, key };

        let draft = ProfileDraft::for_user(user);
        let result = self.inner.backend.get_or_create_profile(&draft).await;
        drop(in_flight);

        if !self.is_current_identity(epoch, &user.id) {
            log::debug!("discarding stale profile result for {}", user.id);
            return;
        }

        match result {
            Ok(outcome) => {
                if outcome.was_created() {
                    log::info!("created profile for {}", user.id);
                }
                let profile = outcome.into_profile();
                self.update(|state| state.profile = Some(profile));
            }
            Err(err) => {
                let err = SessionError::from(err);
                log::warn!("{err}");
                self.update(|state| state.error = Some(err.to_string()));
            }
        }
    }

    fn is_current_identity(&self, epoch: u64, user_id: &str) -> bool {
        self.inner.identity_epoch.get() == epoch && self.inner.state.borrow().user_id() == Some(user_id)
    }

    // =========================================================================
    // Location memory
    // =========================================================================

    /// Remember `path` while a signed-in identity is present and bootstrap has
    /// finished. Called on every route change.
    pub fn track_location(&self, path: &str) {
        let tracking = {
            let state = self.inner.state.borrow();
            state.initialized && state.user.is_some()
        };
        if tracking {
            self.inner.locations.store(path);
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Start the Google OAuth round-trip from `current_path`.
    ///
    /// # Errors
    ///
    /// [`SessionError::OAuthRequest`] when the redirect cannot be started.
    pub async fn sign_in_with_google(&self, current_path: &str) -> Result<(), SessionError> {
        self.sign_in_with(OAuthProvider::Google, current_path).await
    }

    /// Remember `current_path` and hand the browser to `provider`.
    ///
    /// # Errors
    ///
    /// [`SessionError::OAuthRequest`] when the redirect cannot be started.
    pub async fn sign_in_with(&self, provider: OAuthProvider, current_path: &str) -> Result<(), SessionError> {
        self.inner.locations.store(current_path);
        self.inner
            .backend
            .start_oauth_redirect(provider, &self.inner.config.callback_path)
            .await
            .map_err(|err| {
                let err = SessionError::OAuthRequest(err);
                log::warn!("{err}");
                err
            })
    }

    /// Sign out. Loading and the remembered location are cleared whether or
    /// not the service call succeeds.
    ///
    /// # Errors
    ///
    /// [`SessionError::SignOut`] when the service rejects the request.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.update(|state| state.loading = true);
        let result = self.inner.backend.sign_out().await;

        self.inner.locations.clear();
        self.inner.redirect_issued.set(false);
        self.update(|state| {
            state.loading = false;
            state.pending_redirect = None;
        });

        result.map_err(|err| {
            let err = SessionError::SignOut(err);
            log::warn!("{err}");
            err
        })
    }

    /// Best-effort re-fetch of the session; used by the retry affordance.
    /// Failures are recorded, never returned.
    pub async fn restore_session(&self) {
        let seq = self.inner.event_seq.get();
        self.update(|state| state.loading = true);

        match self.inner.backend.get_current_session().await {
            Ok(session) if self.inner.event_seq.get() == seq => self.apply_session(session).await,
            Ok(_) => log::debug!("auth event arrived during restore; keeping newer state"),
            Err(err) => {
                let err = SessionError::SessionFetch(err);
                log::warn!("restore failed: {err}");
                self.update(|state| state.error = Some(err.to_string()));
            }
        }

        self.update(|state| state.loading = false);
    }
}
