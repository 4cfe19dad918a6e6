pub mod auth_store;
pub mod binding;

// Re-export the primary store items so code outside can do
// "use crate::store::{AuthStore, Subscriber};"
pub use auth_store::{AuthStore, Subscriber};
pub use binding::AuthBinding;
