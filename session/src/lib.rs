//! Session lifecycle controller shared by the browser front-end.
//!
//! This crate owns the in-memory mirror of the hosted auth service's state:
//! current session, user identity, application profile, and the
//! loading/initialized flags the UI renders from. It knows nothing about the
//! browser; the `client` crate plugs in the hosted service adapter, the
//! `localStorage` location store, and the `window.location` navigator through
//! the traits exported here.
//!
//! ARCHITECTURE
//! ============
//! - `backend`: async seam to the hosted auth/data service.
//! - `events`: auth-event hub and scoped subscription guard.
//! - `location`: last-visited-path memory across the OAuth round-trip.
//! - `state`: snapshot type read by the rendering layer.
//! - `controller`: bootstrap, change listener, profile resolver, actions.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod location;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_helpers;

pub use backend::{AuthBackend, ProfileOutcome};
pub use config::{OAuthProvider, SessionConfig};
pub use controller::{Activation, Navigator, SessionController};
pub use error::{BackendError, ProfileError, SessionError};
pub use events::{AuthEventHub, AuthSubscription};
pub use location::{LocationMemory, LocationStore, MemoryLocationStore};
pub use state::{ConnectionStatus, SessionState};
pub use types::{AuthEvent, AuthEventKind, ProfileDraft, Session, User, UserProfile};
