//! The authentication state store.
//!
//! A single-writer, multi-reader publish/subscribe cell holding one
//! [`AuthState`]. Clones of an [`AuthStore`] share the same state and
//! subscriber list.
//!
//! Notification rules:
//! - Subscribers are notified synchronously, in subscription order, each
//!   with its own copy of the new state.
//! - A pass iterates a snapshot of the subscriber list taken when the pass
//!   starts, so subscribing or unsubscribing from inside a callback never
//!   skips or double-invokes anyone in that pass.
//! - A `login`/`logout` issued from inside a callback (on the thread running
//!   the pass) updates the state at once and queues its notification; the
//!   running pass finishes first and the queued states are then delivered
//!   in order.
//! - A `login`/`logout` from any other thread waits for the running pass to
//!   finish, then runs its own. It returns only once every subscriber has
//!   seen its state. A subscriber must not block on another thread that is
//!   itself transitioning the same store.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use tracing::{debug, trace, warn};

use crate::models::AuthState;

/// A store listener. Identity is the `Arc` allocation, so keep the handle
/// around to unsubscribe later.
pub type Subscriber<U> = Arc<dyn Fn(AuthState<U>) + Send + Sync>;

struct StoreInner<U> {
    state: AuthState<U>,
    subscribers: Vec<Subscriber<U>>,
    pending: VecDeque<AuthState<U>>,
    /// Thread currently running a notification pass.
    notifier: Option<ThreadId>,
}

struct Shared<U> {
    inner: Mutex<StoreInner<U>>,
    idle: Condvar,
}

pub struct AuthStore<U> {
    shared: Arc<Shared<U>>,
}

impl<U> Clone for AuthStore<U> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<U: Clone> Default for AuthStore<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Clone> AuthStore<U> {
    /// A logged-out store without subscribers.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(StoreInner {
                    state: AuthState::default(),
                    subscribers: Vec::new(),
                    pending: VecDeque::new(),
                    notifier: None,
                }),
                idle: Condvar::new(),
            }),
        }
    }

    /// Mark `user` as logged in and notify every subscriber.
    pub fn login(&self, user: U) {
        debug!(
            event_name = "store.login",
            event_domain = "store",
            "auth state changed to logged in"
        );
        self.transition(AuthState::logged_in(user));
    }

    /// Reset to the logged-out state and notify every subscriber, even when
    /// already logged out.
    pub fn logout(&self) {
        debug!(
            event_name = "store.logout",
            event_domain = "store",
            "auth state changed to logged out"
        );
        self.transition(AuthState::LoggedOut);
    }

    pub fn get_state(&self) -> AuthState<U> {
        self.lock().state.clone()
    }

    /// Append `subscriber` and immediately call it with the current state.
    pub fn subscribe(&self, subscriber: Subscriber<U>) {
        let state = {
            let mut inner = self.lock();
            inner.subscribers.push(subscriber.clone());
            trace!(subscribers = inner.subscribers.len(), "subscriber added");
            inner.state.clone()
        };
        subscriber(state);
    }

    /// Remove every registration of `subscriber`. Unknown subscribers are ignored.
    pub fn unsubscribe(&self, subscriber: &Subscriber<U>) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|existing| !same_subscriber(existing, subscriber));
        trace!(subscribers = inner.subscribers.len(), "subscriber removed");
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Drop every subscriber, used when the session is re-configured.
    pub fn clear_subscribers(&self) {
        self.lock().subscribers.clear();
    }

    fn transition(&self, next: AuthState<U>) {
        let current = thread::current().id();
        {
            let mut inner = self.lock();
            if inner.notifier == Some(current) {
                inner.state = next.clone();
                inner.pending.push_back(next);
                trace!(
                    queued = inner.pending.len(),
                    "transition during notification, queued"
                );
                return;
            }
            while inner.notifier.is_some() {
                inner = self
                    .shared
                    .idle
                    .wait(inner)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            inner.state = next.clone();
            inner.pending.push_back(next);
            inner.notifier = Some(current);
        }

        let _pass = NotifyPass { store: self };
        loop {
            let (snapshot, subscribers) = {
                let mut inner = self.lock();
                match inner.pending.pop_front() {
                    Some(snapshot) => (snapshot, inner.subscribers.clone()),
                    None => {
                        inner.notifier = None;
                        self.shared.idle.notify_all();
                        return;
                    }
                }
            };
            for subscriber in &subscribers {
                subscriber(snapshot.clone());
            }
        }
    }
}

impl<U> AuthStore<U> {
    fn lock(&self) -> MutexGuard<'_, StoreInner<U>> {
        // Callbacks never run while the lock is held, so a poisoned lock
        // still guards consistent data.
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the pass when a subscriber panics mid-pass.
struct NotifyPass<'a, U> {
    store: &'a AuthStore<U>,
}

impl<U> Drop for NotifyPass<'_, U> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut inner = self.store.lock();
            warn!(
                dropped = inner.pending.len(),
                "subscriber panicked during notification, pending states dropped"
            );
            inner.pending.clear();
            inner.notifier = None;
            self.store.shared.idle.notify_all();
        }
    }
}

fn same_subscriber<U>(a: &Subscriber<U>, b: &Subscriber<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<U: fmt::Debug> fmt::Debug for AuthStore<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("AuthStore")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}
