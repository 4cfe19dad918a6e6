//! Pure guard decisions.
//!
//! ```text
//! start -> logged in? --no--> Redirect(login, from = requested)
//!              |
//!             yes -> authorized? --no--> Redirect(dashboard)
//!                        |
//!                       yes -> Allow
//! ```
//!
//! The login check always runs first. Sending a logged-out user to the
//! dashboard (or a logged-in but unauthorized user to the login page) would
//! let a login flow that returns to the saved location loop forever.

use tracing::debug;

use super::Authorizer;
use crate::config::SessionConfig;
use crate::models::{AuthState, GuardDecision, Location, Redirect};

/// Allow logged-in users, send everyone else to the login route with the
/// requested location preserved.
pub fn require_login<U>(
    state: &AuthState<U>,
    config: &SessionConfig,
    location: &Location,
) -> GuardDecision {
    if state.is_logged_in() {
        return GuardDecision::Allow;
    }

    debug!(
        event_name = "guard.login_required",
        event_domain = "guards",
        requested = %location,
        redirect = config.login_route.as_str(),
        "not logged in, redirecting to login"
    );
    GuardDecision::Redirect(Redirect::with_from(
        config.login_route.clone(),
        location.clone(),
    ))
}

/// Like [`require_login`], then bounce logged-in users the authorizer
/// rejects to the dashboard route, without a saved location.
pub fn require_authorization<U, A>(
    state: &AuthState<U>,
    authorizer: &A,
    config: &SessionConfig,
    location: &Location,
) -> GuardDecision
where
    A: Authorizer<U> + ?Sized,
{
    let user = match state.current_user() {
        Some(user) => user,
        None => return require_login(state, config, location),
    };

    if authorizer.authorize(user) {
        return GuardDecision::Allow;
    }

    debug!(
        event_name = "guard.unauthorized",
        event_domain = "guards",
        requested = %location,
        redirect = config.dashboard_route.as_str(),
        "authorizer rejected user, redirecting to dashboard"
    );
    GuardDecision::Redirect(Redirect::to(config.dashboard_route.clone()))
}
