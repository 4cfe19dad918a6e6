pub mod location;
pub mod state;

// Re-export so callers can do "use crate::models::{AuthState, Location};"
pub use location::{GuardDecision, Location, Redirect};
pub use state::AuthState;
