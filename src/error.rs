//! Error taxonomy shared by the store, session, transport and guards.

use reqwest::StatusCode;
use thiserror::Error;

/// Every failure surfaced by this crate.
///
/// Network failures from the underlying HTTP client are carried through
/// [`AuthError::Transport`] untouched; only received responses are ever
/// interpreted for their status code.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Config or store accessed before the session was configured.
    #[error("the authentication session is not initialized")]
    NotInitialized,

    /// The process-wide session was configured for another user type.
    #[error("the authentication session was configured for a different user type than {expected}")]
    UserTypeMismatch { expected: &'static str },

    /// A logged-in context was assumed while the store reports logged out.
    #[error("asked for the current user whilst not logged in")]
    NotLoggedIn,

    /// The store no longer notifies this binding, e.g. after the session
    /// was re-configured.
    #[error("the binding is no longer attached to its store")]
    BindingDetached,

    /// An authentication exchange received a non-success status.
    #[error("authentication request failed with status {status}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("invalid request url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] figment::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl AuthError {
    /// Status of the response that produced this error, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthError::RequestFailed { status, .. } => Some(*status),
            AuthError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_reports_status() {
        let err = AuthError::RequestFailed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            err.to_string(),
            "authentication request failed with status 500 Internal Server Error"
        );
    }

    #[test]
    fn non_http_errors_have_no_status() {
        assert_eq!(AuthError::NotInitialized.status(), None);
        assert_eq!(AuthError::NotLoggedIn.status(), None);
    }
}
