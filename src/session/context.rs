//! Process-wide session slot.
//!
//! `configure` at the composition root, read with `get_*` anywhere else,
//! `reset` in test teardown. Re-configuring replaces the session outright:
//! the previous store loses its subscribers and its state is discarded.

use std::any::{type_name, Any};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::Session;
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::store::AuthStore;

struct Context {
    config: SessionConfig,
    session: Box<dyn Any + Send + Sync>,
    teardown: Box<dyn Fn() + Send + Sync>,
}

static CONTEXT: RwLock<Option<Context>> = RwLock::new(None);

fn read() -> RwLockReadGuard<'static, Option<Context>> {
    CONTEXT.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, Option<Context>> {
    CONTEXT.write().unwrap_or_else(PoisonError::into_inner)
}

/// Install a fresh session for user type `U`, replacing any previous one.
pub fn configure<U>(config: SessionConfig) -> Session<U>
where
    U: Clone + Send + Sync + 'static,
{
    let session = Session::<U>::configure(config.clone());
    let store = session.store().clone();
    let context = Context {
        config,
        session: Box::new(session.clone()),
        teardown: Box::new(move || store.clear_subscribers()),
    };

    let previous = write().replace(context);
    if let Some(previous) = previous {
        info!("Replacing previously configured authentication session");
        (previous.teardown)();
    }
    session
}

/// Drop the process-wide session. Subsequent reads fail with `NotInitialized`.
pub fn reset() {
    let previous = write().take();
    if let Some(previous) = previous {
        debug!("Resetting authentication session");
        (previous.teardown)();
    }
}

pub fn is_configured() -> bool {
    read().is_some()
}

pub fn get_config() -> Result<SessionConfig, AuthError> {
    read()
        .as_ref()
        .map(|context| context.config.clone())
        .ok_or(AuthError::NotInitialized)
}

/// The configured session, provided it was configured for user type `U`.
pub fn get_session<U>() -> Result<Session<U>, AuthError>
where
    U: Clone + Send + Sync + 'static,
{
    let guard = read();
    let context = guard.as_ref().ok_or(AuthError::NotInitialized)?;
    context
        .session
        .downcast_ref::<Session<U>>()
        .cloned()
        .ok_or(AuthError::UserTypeMismatch {
            expected: type_name::<U>(),
        })
}

pub fn get_store<U>() -> Result<AuthStore<U>, AuthError>
where
    U: Clone + Send + Sync + 'static,
{
    get_session::<U>().map(|session| session.store().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthState;
    use crate::store::Subscriber;
    use std::sync::{Arc, Mutex};

    // The slot is process-wide; keep these tests from interleaving.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn reads_fail_before_configure() {
        let _guard = lock();
        reset();

        assert!(!is_configured());
        assert!(matches!(get_config(), Err(AuthError::NotInitialized)));
        assert!(matches!(
            get_store::<String>(),
            Err(AuthError::NotInitialized)
        ));
    }

    #[test]
    fn configure_with_defaults() {
        let _guard = lock();
        configure::<String>(SessionConfig::default());

        let config = get_config().unwrap();
        assert_eq!(config.authentication_url, "/api/authentication");
        assert_eq!(config.current_user_url, "/api/authentication/current");
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.dashboard_route, "/");
        reset();
    }

    #[test]
    fn store_is_shared_with_returned_session() {
        let _guard = lock();
        let session = configure::<String>(SessionConfig::default());

        session.store().login("henk".to_string());

        assert_eq!(
            get_store::<String>().unwrap().get_state(),
            AuthState::logged_in("henk".to_string())
        );
        reset();
    }

    #[test]
    fn reconfigure_replaces_store_and_drops_subscribers() {
        let _guard = lock();
        let first = configure::<String>(SessionConfig::default());
        let subscriber: Subscriber<String> = Arc::new(|_| {});
        first.store().subscribe(subscriber);
        first.store().login("henk".to_string());

        configure::<String>(SessionConfig {
            login_route: "/sign-in".to_string(),
            ..SessionConfig::default()
        });

        assert_eq!(first.store().subscriber_count(), 0);
        assert_eq!(get_config().unwrap().login_route, "/sign-in");
        assert_eq!(
            get_store::<String>().unwrap().get_state(),
            AuthState::LoggedOut
        );
        reset();
    }

    #[test]
    fn wrong_user_type_is_reported() {
        let _guard = lock();
        configure::<String>(SessionConfig::default());

        let result = get_session::<u64>();

        assert!(matches!(
            result,
            Err(AuthError::UserTypeMismatch { expected: "u64" })
        ));
        reset();
    }
}
