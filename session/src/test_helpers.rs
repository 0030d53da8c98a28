//! In-memory backend, navigator, and fixtures shared by controller tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::backend::AuthBackend;
use crate::config::{OAuthProvider, SessionConfig};
use crate::controller::{Navigator, SessionController};
use crate::error::BackendError;
use crate::events::{AuthEventHub, AuthSubscription};
use crate::location::MemoryLocationStore;
use crate::types::{AuthEvent, ProfileDraft, Session, User, UserProfile};

pub(crate) fn user(id: &str) -> User {
    User {
        id: id.to_owned(),
        email: Some(format!("{id}@example.com")),
        full_name: Some(format!("User {id}")),
        avatar_url: Some(format!("https://img.example.com/{id}.png")),
    }
}

pub(crate) fn session_for(id: &str) -> Session {
    Session {
        access_token: format!("access-{id}"),
        refresh_token: Some(format!("refresh-{id}")),
        expires_at: None,
        user: user(id),
    }
}

pub(crate) fn profile_for(id: &str, status: &str) -> UserProfile {
    UserProfile {
        id: id.to_owned(),
        email: Some(format!("{id}@example.com")),
        full_name: Some(format!("User {id}")),
        avatar_url: None,
        subscription_status: status.to_owned(),
        created_at: None,
    }
}

pub(crate) fn network_error() -> BackendError {
    BackendError::Network("connection refused".to_owned())
}

/// Scriptable stand-in for the hosted service.
pub(crate) struct FakeBackend {
    pub hub: AuthEventHub,
    pub session: RefCell<Result<Option<Session>, BackendError>>,
    pub profiles: RefCell<HashMap<String, UserProfile>>,
    pub query_error: RefCell<Option<BackendError>>,
    pub insert_error: RefCell<Option<BackendError>>,
    pub sign_out_error: RefCell<Option<BackendError>>,
    pub oauth_error: RefCell<Option<BackendError>>,
    pub inserts: Cell<usize>,
    pub session_fetches: Cell<usize>,
    pub oauth_requests: RefCell<Vec<(OAuthProvider, String)>>,
    session_gate: RefCell<Option<oneshot::Receiver<()>>>,
    profile_gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            hub: AuthEventHub::new(),
            session: RefCell::new(Ok(None)),
            profiles: RefCell::new(HashMap::new()),
            query_error: RefCell::new(None),
            insert_error: RefCell::new(None),
            sign_out_error: RefCell::new(None),
            oauth_error: RefCell::new(None),
            inserts: Cell::new(0),
            session_fetches: Cell::new(0),
            oauth_requests: RefCell::new(Vec::new()),
            session_gate: RefCell::new(None),
            profile_gates: RefCell::new(HashMap::new()),
        })
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self.session.borrow_mut() = Ok(session);
    }

    pub(crate) fn fail_session(&self, err: BackendError) {
        *self.session.borrow_mut() = Err(err);
    }

    pub(crate) fn put_profile(&self, profile: UserProfile) {
        self.profiles.borrow_mut().insert(profile.id.clone(), profile);
    }

    /// Hold the next session fetch until the returned sender fires.
    pub(crate) fn gate_session(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.session_gate.borrow_mut() = Some(rx);
        tx
    }

    /// Hold the next profile lookup for `user_id` until the returned sender fires.
    pub(crate) fn gate_profile(&self, user_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.profile_gates.borrow_mut().insert(user_id.to_owned(), rx);
        tx
    }

    pub(crate) fn emit(&self, event: &AuthEvent) {
        self.hub.emit(event);
    }
}

#[async_trait::async_trait(?Send)]
impl AuthBackend for FakeBackend {
    async fn get_current_session(&self) -> Result<Option<Session>, BackendError> {
        self.session_fetches.set(self.session_fetches.get() + 1);
        let gate = self.session_gate.borrow_mut().take();
        if let Some(gate) = gate {
            if gate.await.is_err() {
                return Err(BackendError::Network("gate dropped".to_owned()));
            }
        }
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.hub.subscribe()
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if let Some(err) = self.sign_out_error.borrow().clone() {
            return Err(err);
        }
        self.set_session(None);
        self.hub.emit(&AuthEvent::signed_out());
        Ok(())
    }

    async fn start_oauth_redirect(&self, provider: OAuthProvider, return_path: &str) -> Result<(), BackendError> {
        self.oauth_requests
            .borrow_mut()
            .push((provider, return_path.to_owned()));
        match self.oauth_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn query_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let gate = self.profile_gates.borrow_mut().remove(user_id);
        if let Some(gate) = gate {
            if gate.await.is_err() {
                return Err(BackendError::Network("gate dropped".to_owned()));
            }
        }
        if let Some(err) = self.query_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.profiles.borrow().get(user_id).cloned())
    }

    async fn insert_profile(&self, draft: &ProfileDraft) -> Result<UserProfile, BackendError> {
        self.inserts.set(self.inserts.get() + 1);
        if let Some(err) = self.insert_error.borrow().clone() {
            return Err(err);
        }
        let row = UserProfile {
            id: draft.id.clone(),
            email: draft.email.clone(),
            full_name: draft.full_name.clone(),
            avatar_url: draft.avatar_url.clone(),
            subscription_status: draft.subscription_status.clone(),
            created_at: Some("2026-01-01T00:00:00Z".to_owned()),
        };
        self.put_profile(row.clone());
        Ok(row)
    }
}

/// Navigator that records every requested destination.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub visits: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn assign(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }
}

pub(crate) struct Harness {
    pub controller: SessionController,
    pub backend: Rc<FakeBackend>,
    pub store: Rc<MemoryLocationStore>,
    pub navigator: Rc<RecordingNavigator>,
}

pub(crate) fn harness() -> Harness {
    let backend = FakeBackend::new();
    let store = Rc::new(MemoryLocationStore::new());
    let navigator = Rc::new(RecordingNavigator::default());
    let controller = SessionController::new(
        backend.clone(),
        store.clone(),
        navigator.clone(),
        SessionConfig::default(),
    );
    Harness { controller, backend, store, navigator }
}
