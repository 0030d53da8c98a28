//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Bridges the framework-neutral [`SessionController`] into Leptos: every
//! committed snapshot is mirrored into an `RwSignal<SessionState>` that route
//! guards, the status indicator, and pages read, while actions go back
//! through the controller.
//!
//! LIFECYCLE
//! =========
//! [`AuthContext::install`] runs once in the app root. It registers the
//! signal watcher, spawns the controller's bootstrap-and-listen driver, and
//! ties both to the root owner's cleanup so unmounting the app drops the auth
//! subscription.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use session::{SessionConfig, SessionController, SessionError, SessionState};

use crate::config::ClientConfig;
use crate::net::hosted::HostedAuthBackend;
use crate::util::browser::BrowserNavigator;
use crate::util::storage::BrowserLocationStore;

/// Wire the controller to the hosted service and the browser adapters.
pub fn build_controller(config: &ClientConfig, session_config: SessionConfig) -> SessionController {
    let backend = HostedAuthBackend::new(config.clone());
    SessionController::new(backend, Rc::new(BrowserLocationStore), Rc::new(BrowserNavigator), session_config)
}

/// Copyable handle provided via context.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<SessionState>,
    controller: StoredValue<SessionController, LocalStorage>,
}

impl AuthContext {
    /// Mirror `controller` into a fresh signal. Does not start the controller.
    pub fn new(controller: SessionController) -> Self {
        let state = RwSignal::new(controller.state());
        let watcher = controller.watch(move |snapshot| state.set(snapshot.clone()));
        let controller = StoredValue::new_local(controller);
        on_cleanup(move || {
            controller.try_with_value(|c| c.unwatch(watcher));
        });
        Self { state, controller }
    }

    /// Create the context, start the controller, and provide it to descendants.
    pub fn install(controller: SessionController) -> Self {
        let ctx = Self::new(controller);
        #[cfg(feature = "csr")]
        {
            let (activation, driver) = ctx.controller().activate();
            leptos::task::spawn_local(driver);
            on_cleanup(move || activation.teardown());
        }
        provide_context(ctx);
        ctx
    }

    pub fn controller(&self) -> SessionController {
        self.controller.get_value()
    }

    pub fn track_location(&self, path: &str) {
        self.controller().track_location(path);
    }

    pub async fn sign_in_with_google(self, current_path: String) -> Result<(), SessionError> {
        self.controller().sign_in_with_google(&current_path).await
    }

    pub async fn sign_out(self) -> Result<(), SessionError> {
        self.controller().sign_out().await
    }

    pub async fn restore_session(self) {
        self.controller().restore_session().await;
    }

    /// Fire-and-forget [`Self::restore_session`] for event handlers.
    pub fn spawn_restore(self) {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(self.restore_session());
    }
}
