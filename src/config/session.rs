use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Endpoint locations and redirect routes for one authentication session.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct SessionConfig {
    /// POST here to log in, DELETE here to log out.
    #[serde(default = "default_authentication_url")]
    pub authentication_url: String,
    /// GET here to retrieve the current user.
    #[serde(default = "default_current_user_url")]
    pub current_user_url: String,
    /// Where guards send users that are not logged in.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    /// Where guards send logged-in users that fail an authorization check.
    #[serde(default = "default_dashboard_route")]
    pub dashboard_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            authentication_url: default_authentication_url(),
            current_user_url: default_current_user_url(),
            login_route: default_login_route(),
            dashboard_route: default_dashboard_route(),
        }
    }
}

fn default_authentication_url() -> String {
    "/api/authentication".to_string()
}

fn default_current_user_url() -> String {
    "/api/authentication/current".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_dashboard_route() -> String {
    "/".to_string()
}
