//! Outbound HTTP for the authentication session.
//!
//! [`AuthTransport`] performs the login / current-user / logout exchanges and
//! wraps arbitrary requests with same-origin credentials, the anti-forgery
//! header, and the logout-on-401 policy.

pub mod client;
pub mod cookies;
pub mod interceptor;
pub mod request;
pub mod xsrf;

pub use client::AuthTransport;
pub use cookies::SameOriginJar;
pub use interceptor::{is_unauthorized, on_response_error, ResponseStatus};
pub use request::{RequestMethod, RequestOptions};
pub use xsrf::{xsrf_token_from_cookies, XSRF_COOKIE, XSRF_HEADER};
