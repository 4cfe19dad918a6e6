use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::AuthError;

/// Parse a configured level name ("trace" .. "error"), case-insensitive.
pub fn parse_level(level: &str) -> Result<LevelFilter, AuthError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(AuthError::Logging(format!(
            "invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            level
        ))),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` directives are honoured on top of the configured level. The
/// subscriber also captures `log` records, which is how reqwest reports.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), AuthError> {
    let level_filter = parse_level(&logging_config.level)?;
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter_layer);
    let result = match logging_config.format.to_lowercase().as_str() {
        // Structured JSON output, one object per line
        "json" => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .try_init(),
        // Human-readable console output; also the fallback for unknown formats
        _ => registry.with(fmt::layer().pretty()).try_init(),
    };
    result.map_err(|e| AuthError::Logging(e.to_string()))
}
