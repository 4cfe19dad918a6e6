//! Session handles pairing a [`SessionConfig`](crate::config::SessionConfig)
//! with its [`AuthStore`](crate::store::AuthStore).
//!
//! Prefer passing a [`Session`] explicitly. The [`context`] module offers a
//! process-wide slot for composition roots that cannot thread a handle through.

pub mod context;
pub mod session;

pub use session::Session;
