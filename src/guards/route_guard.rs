use super::decision::{require_authorization, require_login};
use super::Authorizer;
use crate::models::{GuardDecision, Location};
use crate::session::Session;

/// Guard bound to a session. Every evaluation reads a fresh store snapshot,
/// so decisions follow logins and logouts without re-creating the guard.
pub struct RouteGuard<U> {
    session: Session<U>,
}

impl<U> Clone for RouteGuard<U> {
    fn clone(&self) -> Self {
        RouteGuard {
            session: self.session.clone(),
        }
    }
}

impl<U: Clone> RouteGuard<U> {
    pub fn new(session: Session<U>) -> Self {
        RouteGuard { session }
    }

    /// Gate on login only.
    pub fn is_authenticated(&self, location: &Location) -> GuardDecision {
        let state = self.session.store().get_state();
        require_login(&state, self.session.config(), location)
    }

    /// Gate on login, then on `authorizer`.
    pub fn is_authorized<A>(&self, location: &Location, authorizer: &A) -> GuardDecision
    where
        A: Authorizer<U> + ?Sized,
    {
        let state = self.session.store().get_state();
        require_authorization(&state, authorizer, self.session.config(), location)
    }
}
