//! Logging initialization.
//!
//! Log output goes to stderr; stdout carries the JSON result only.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when set.
pub fn init(default_level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(config: &altai_core::Config, verbose: bool, json_logs: bool) {
    let (level, json_format) = settings(&config.logging, verbose, json_logs);
    init(&level, json_format);
}

fn settings(
    logging: &altai_core::config::LoggingConfig,
    verbose: bool,
    json_logs: bool,
) -> (String, bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        logging.level.to_lowercase()
    };
    (level, json_logs || logging.format == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use altai_core::config::LoggingConfig;

    #[test]
    fn test_settings_follow_config() {
        let logging = LoggingConfig {
            level: "WARN".to_string(),
            format: "json".to_string(),
        };
        assert_eq!(settings(&logging, false, false), ("warn".to_string(), true));
    }

    #[test]
    fn test_flags_override_config() {
        let logging = LoggingConfig::default();
        assert_eq!(settings(&logging, true, true), ("debug".to_string(), true));
        assert_eq!(settings(&logging, false, false), ("info".to_string(), false));
    }
}
