//! Logging setup.
//!
//! Library code only emits `tracing` events; applications embedding cartflow
//! call [`init_logging`] once at startup, or install their own subscriber.

use crate::config::LoggingConfig;
use crate::errors::CartflowError;
use tracing_subscriber::EnvFilter;

/// Builds the event filter: `RUST_LOG` when set, otherwise the configured
/// default directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, CartflowError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.default_directive).map_err(|e| {
        CartflowError::Logging(format!(
            "invalid directive '{}': {e}",
            config.default_directive
        ))
    })
}

/// Installs a global `fmt` subscriber.
///
/// Fails if the directive is invalid or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
}
