//! Library exports for authgate, shared between the binary and tests.
//!
//! Client-side authentication state: a publish/subscribe store of the
//! logged-in user, route guards deciding between rendering and redirecting,
//! and an HTTP transport that keeps the store in sync with the back-end.

pub mod config;
pub mod error;
pub mod guards;
pub mod models;
pub mod session;
pub mod store;
pub mod transport;
pub mod utils;

pub use error::AuthError;
pub use models::{AuthState, GuardDecision, Location, Redirect};
pub use session::Session;
pub use store::{AuthBinding, AuthStore, Subscriber};
pub use transport::{AuthTransport, RequestMethod, RequestOptions};
