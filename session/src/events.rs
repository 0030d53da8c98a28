//! Auth-event fan-out with scoped subscriptions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Backends publish auth transitions through an [`AuthEventHub`]; the
//! controller holds one [`AuthSubscription`] for as long as it is active.
//! Dropping the subscription unregisters it, so every exit path of the
//! listener (teardown, abort, stream end) releases it.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::types::AuthEvent;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, UnboundedSender<AuthEvent>)>,
}

/// Single-threaded broadcaster of [`AuthEvent`]s.
#[derive(Clone, Default)]
pub struct AuthEventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl AuthEventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Events emitted afterwards are queued for it
    /// until it is dropped.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded();
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, tx));
            id
        };

        let hub: Weak<RefCell<HubInner>> = Rc::downgrade(&self.inner);
        AuthSubscription::new(rx, move || {
            if let Some(inner) = hub.upgrade() {
                inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
            }
        })
    }

    /// Deliver `event` to every live subscriber, pruning closed ones.
    pub fn emit(&self, event: &AuthEvent) {
        let mut inner = self.inner.borrow_mut();
        inner
            .subscribers
            .retain(|(_, tx)| tx.unbounded_send(event.clone()).is_ok());
        log::debug!(
            "auth event {} delivered to {} subscriber(s)",
            event.kind.as_str(),
            inner.subscribers.len()
        );
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Handle to one auth-event stream. Unsubscribes on drop.
pub struct AuthSubscription {
    receiver: UnboundedReceiver<AuthEvent>,
    release: Option<Box<dyn FnOnce()>>,
}

impl AuthSubscription {
    /// Wrap a receiver with the hook that unregisters it.
    pub fn new(receiver: UnboundedReceiver<AuthEvent>, release: impl FnOnce() + 'static) -> Self {
        Self { receiver, release: Some(Box::new(release)) }
    }

    /// Explicitly release the subscription. Equivalent to dropping it.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Stream for AuthSubscription {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
