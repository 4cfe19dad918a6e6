//! Reactive binding between an [`AuthStore`] and a UI render loop.
//!
//! The binding registers a store subscriber that mirrors every state into a
//! `tokio::sync::watch` channel. Because subscribing delivers the current
//! state immediately, a fresh binding is never without an initial value.
//!
//! Only the store holds the subscriber strongly. When the store lets go of
//! it (for example because the session was re-configured), the channel
//! closes and [`AuthBinding::changed`] reports the binding as detached
//! instead of waiting forever.

use std::fmt;
use std::sync::{Arc, Weak};

use tokio::sync::watch;

use super::{AuthStore, Subscriber};
use crate::error::AuthError;
use crate::models::AuthState;

pub struct AuthBinding<U: Clone> {
    store: AuthStore<U>,
    subscriber: Weak<dyn Fn(AuthState<U>) + Send + Sync>,
    receiver: watch::Receiver<AuthState<U>>,
}

impl<U> AuthStore<U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Mirror this store into a watch channel until the binding is dropped.
    pub fn bind(&self) -> AuthBinding<U> {
        let (sender, receiver) = watch::channel(AuthState::LoggedOut);
        let subscriber: Subscriber<U> = Arc::new(move |state| {
            sender.send_replace(state);
        });
        let weak = Arc::downgrade(&subscriber);
        self.subscribe(subscriber);

        // The initial delivery is the starting value, not a change.
        let mut receiver = receiver;
        receiver.borrow_and_update();

        AuthBinding {
            store: self.clone(),
            subscriber: weak,
            receiver,
        }
    }
}

impl<U> AuthBinding<U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Latest state seen by the binding.
    pub fn state(&self) -> AuthState<U> {
        self.receiver.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.receiver.borrow().is_logged_in()
    }

    /// The current user, for call sites that already asserted login via a guard.
    pub fn current_user(&self) -> Result<U, AuthError> {
        self.receiver
            .borrow()
            .current_user()
            .cloned()
            .ok_or(AuthError::NotLoggedIn)
    }

    /// Wait for the next state published by the store.
    ///
    /// Only the latest state is kept, so a burst of transitions between two
    /// calls yields the final one. Fails with `BindingDetached` once the
    /// store has dropped this binding's subscriber.
    pub async fn changed(&mut self) -> Result<AuthState<U>, AuthError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| AuthError::BindingDetached)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Whether the store still notifies this binding.
    pub fn is_attached(&self) -> bool {
        self.subscriber.strong_count() > 0
    }

    /// A receiver for consumers that want to drive their own select loop.
    pub fn receiver(&self) -> watch::Receiver<AuthState<U>> {
        self.receiver.clone()
    }
}

impl<U: Clone> Drop for AuthBinding<U> {
    fn drop(&mut self) {
        if let Some(subscriber) = self.subscriber.upgrade() {
            self.store.unsubscribe(&subscriber);
        }
    }
}

impl<U: Clone + fmt::Debug> fmt::Debug for AuthBinding<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthBinding")
            .field("state", &*self.receiver.borrow())
            .finish()
    }
}
