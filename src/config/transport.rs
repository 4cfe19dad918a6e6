use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the authentication back-end lives and how long to wait for it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct TransportConfig {
    /// Origin relative endpoint URLs are resolved against. Requests to any
    /// other origin are sent without credentials.
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        TransportConfig {
            base_url: base_url.into(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

fn default_timeout_in_ms() -> u64 {
    30_000
}
