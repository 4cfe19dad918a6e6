use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::session::SessionConfig;
use super::transport::TransportConfig;
use crate::error::AuthError;

/// Environment variables with this prefix override file values,
/// `__` separates nested keys (e.g. `AUTHGATE_TRANSPORT__BASE_URL`).
pub const ENV_PREFIX: &str = "AUTHGATE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: session endpoints/routes, transport, logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub session: SessionConfig,
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The figment used by [`load_config`]: the YAML file, then environment overrides.
pub fn figment(path: impl AsRef<Path>) -> Figment {
    Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load config from a YAML file, with `AUTHGATE_` environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigV1, AuthError> {
    extract_config(&figment(path))
}

/// Extract a versioned config from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, AuthError> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// JSON schema of the configuration file format.
pub fn config_schema() -> RootSchema {
    schema_for!(Config)
}
