//! Snapshot of the session store as seen by the rendering layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller is the only writer. UI code receives clones of this struct
//! through watchers and derives indicator state from the helpers below.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::types::{Session, User, UserProfile};

/// Current session, identity, profile, and lifecycle flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub user: Option<User>,
    pub profile: Option<UserProfile>,
    /// An external call the UI should wait on is in flight.
    pub loading: bool,
    /// Bootstrap finished (successfully or not). Never reverts.
    pub initialized: bool,
    /// Most recent captured session/profile failure, for display.
    pub error: Option<String>,
    /// Path a post-sign-in navigation was issued for, if any.
    pub pending_redirect: Option<String>,
}

/// Three-way status rendered by the connection indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Error,
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Error => "error",
        }
    }
}

impl SessionState {
    /// Session present and no pending error.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.session.is_some() && self.error.is_none()
    }

    /// An error is showing and nothing is in flight.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.error.is_some() && !self.loading
    }

    /// Indicator state. Before bootstrap completes the controller is
    /// considered to be connecting.
    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        if self.is_healthy() {
            ConnectionStatus::Connected
        } else if self.loading || !self.initialized {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Error
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }
}
