//! Diagnostic logging
//!
//! Logs go to stderr through a `tracing-subscriber` fmt layer so that stdout
//! stays reserved for command output. The level comes from `--log-level`,
//! then the `DIFFTREE_LOG` environment variable, then defaults to `warn`.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "DIFFTREE_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the global subscriber
///
/// Calling it again once a subscriber is installed does nothing.
pub fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = build_env_filter(level)?;

    let result = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }

    Ok(())
}

fn build_env_filter(level: Option<&str>) -> anyhow::Result<EnvFilter> {
    if let Some(level) = level {
        return EnvFilter::try_new(level).with_context(|| format!("Invalid log level {level:?}"));
    }

    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::new(DEFAULT_LOG_LEVEL)),
    }
}
