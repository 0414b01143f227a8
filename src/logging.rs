//! Tracing subscriber setup for the CLI.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor `--log-level` is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init(level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid log level '{level}': {e}"))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(false))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false))
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_without_panicking() {
        let _ = init(DEFAULT_LOG_LEVEL, LogFormat::Pretty);
        assert!(init(DEFAULT_LOG_LEVEL, LogFormat::Json).is_err());
    }

    #[test]
    fn test_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
