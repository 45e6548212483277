//! Structured diagnostics on stderr via `tracing`.
//!
//! Reports go to stdout (or a file); logs never do, so JSON output stays
//! machine-readable.

use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "VALIDATE_AGENTS_LOG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: text or json
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            other => {
                return Err(ValidatorError::InvalidConfig(format!(
                    "Invalid log level: {} (must be trace, debug, info, warn, error or off)",
                    other
                )))
            }
        }
        if self.format != "text" && self.format != "json" {
            return Err(ValidatorError::InvalidConfig(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                self.format
            )));
        }
        Ok(())
    }
}

/// Install the global subscriber.
///
/// Priority: `VALIDATE_AGENTS_LOG`, then `verbose` (debug), then the
/// configured level.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = build_env_filter(config, verbose)?;
    let registry = Registry::default().with(filter);

    let result = if config.format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ValidatorError::InvalidConfig(format!("Failed to initialize logging: {}", e)))
}

/// Run `f` with a stderr subscriber scoped to the current thread.
///
/// Used while configuration is still being loaded, before the configured
/// level and format are known. Honors `VALIDATE_AGENTS_LOG` and `verbose`.
pub fn with_bootstrap_logging<T>(verbose: bool, f: impl FnOnce() -> T) -> T {
    let filter = build_env_filter(&LoggingConfig::default(), verbose)
        .unwrap_or_else(|_| EnvFilter::new(default_log_level()));
    let subscriber = Registry::default().with(filter).with(
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr),
    );
    tracing::subscriber::with_default(subscriber, f)
}

fn build_env_filter(config: &LoggingConfig, verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_new(level)
        .map_err(|e| ValidatorError::InvalidConfig(format!("Invalid log directive: {}", e)))
}
