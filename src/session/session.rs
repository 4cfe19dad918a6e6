use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::SessionConfig;
use crate::store::AuthStore;

/// A configured authentication session: immutable config plus its store.
///
/// Cloning is cheap and every clone shares the same store.
pub struct Session<U> {
    config: Arc<SessionConfig>,
    store: AuthStore<U>,
}

impl<U> Clone for Session<U> {
    fn clone(&self) -> Self {
        Session {
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}

impl<U: Clone> Session<U> {
    /// Start a session with a fresh, logged-out store.
    pub fn configure(config: SessionConfig) -> Self {
        info!(
            authentication_url = config.authentication_url.as_str(),
            current_user_url = config.current_user_url.as_str(),
            login_route = config.login_route.as_str(),
            dashboard_route = config.dashboard_route.as_str(),
            "Configuring authentication session"
        );
        Session {
            config: Arc::new(config),
            store: AuthStore::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::configure(SessionConfig::default())
    }
}

impl<U> Session<U> {
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &AuthStore<U> {
        &self.store
    }
}

impl<U: fmt::Debug> fmt::Debug for Session<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}
