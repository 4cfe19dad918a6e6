//! Logout-on-401 policy for request pipelines that report failures as errors.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use crate::error::AuthError;
use crate::store::AuthStore;

/// Anything that may carry the HTTP status of a received response.
pub trait ResponseStatus {
    fn response_status(&self) -> Option<StatusCode>;
}

impl ResponseStatus for StatusCode {
    fn response_status(&self) -> Option<StatusCode> {
        Some(*self)
    }
}

impl ResponseStatus for reqwest::Response {
    fn response_status(&self) -> Option<StatusCode> {
        Some(self.status())
    }
}

impl ResponseStatus for reqwest::Error {
    fn response_status(&self) -> Option<StatusCode> {
        self.status()
    }
}

impl ResponseStatus for AuthError {
    fn response_status(&self) -> Option<StatusCode> {
        self.status()
    }
}

/// Loosely shaped error payloads: `{"response": {"status": 401}}` when a
/// `response` key is present, `{"status": 401}` otherwise.
impl ResponseStatus for Value {
    fn response_status(&self) -> Option<StatusCode> {
        let status = match self.get("response") {
            Some(response) => response.get("status"),
            None => self.get("status"),
        }?;
        status
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
    }
}

impl<T: ResponseStatus + ?Sized> ResponseStatus for &T {
    fn response_status(&self) -> Option<StatusCode> {
        (**self).response_status()
    }
}

pub fn is_unauthorized<E: ResponseStatus + ?Sized>(error: &E) -> bool {
    error.response_status() == Some(StatusCode::UNAUTHORIZED)
}

/// Log the store out when `error` reports a 401, then hand the error back.
///
/// The error is never swallowed, so this composes with `Result::or_else`:
/// `result.or_else(|e| on_response_error(&store, e))`.
pub fn on_response_error<U, T, E>(store: &AuthStore<U>, error: E) -> Result<T, E>
where
    U: Clone,
    E: ResponseStatus,
{
    if is_unauthorized(&error) {
        warn!(
            event_name = "transport.unauthorized",
            event_domain = "transport",
            "response error reported 401, logging out"
        );
        store.logout();
    }
    Err(error)
}
