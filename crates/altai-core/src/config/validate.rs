//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::providers::Provider;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.harness.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "harness.timeout_ms must be > 0".into(),
            ));
        }
        if Provider::from_name(&self.harness.provider).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "harness.provider \"{}\" is not a known provider",
                self.harness.provider
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }

        for (provider, overrides) in self.providers.iter() {
            if let Some(t) = overrides.temperature {
                if !(0.0..=2.0).contains(&t) {
                    return Err(ConfigError::ValidationError(format!(
                        "providers.{provider}.temperature must be between 0.0 and 2.0"
                    )));
                }
            }
            if overrides.max_tokens == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{provider}.max_tokens must be > 0"
                )));
            }
        }
        Ok(())
    }
}
