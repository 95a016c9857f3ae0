//! `tracing` subscriber setup.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Level names indexed by `-v` count, starting from the configured level.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Raise `base` by `verbosity` steps, saturating at `trace`.
pub fn effective_level(base: &str, verbosity: u8) -> String {
    let start = LEVELS
        .iter()
        .position(|level| level.eq_ignore_ascii_case(base.trim()));
    match start {
        Some(idx) => LEVELS[(idx + verbosity as usize).min(LEVELS.len() - 1)].to_string(),
        // Not a plain level (e.g. "vdt_send=debug"); leave it to EnvFilter.
        None => base.to_string(),
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig, verbosity: u8) -> AppResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(effective_level(&config.level, verbosity))
            .map_err(|e| AppError::Logging(e.to_string()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("warn", 0), "warn");
        assert_eq!(effective_level("warn", 1), "info");
        assert_eq!(effective_level("WARN", 2), "debug");
        assert_eq!(effective_level("info", 9), "trace");
        assert_eq!(effective_level("vdt_send=debug", 2), "vdt_send=debug");
    }

    // The only test in this crate that installs a global subscriber.
    #[test]
    fn test_init_installs_once() {
        let json = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        };
        let compact = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        };

        assert!(init(&json, 0).is_ok());
        tracing::info!("subscriber installed");
        assert!(matches!(init(&compact, 1), Err(AppError::Logging(_))));
    }
}
