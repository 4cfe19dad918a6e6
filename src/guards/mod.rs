//! Route guards: decide whether protected content may render or where the
//! routing layer should redirect instead.

pub mod authorizer;
pub mod decision;
pub mod route_guard;

pub use authorizer::Authorizer;
pub use decision::{require_authorization, require_login};
pub use route_guard::RouteGuard;
