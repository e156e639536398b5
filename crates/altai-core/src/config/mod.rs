//! Configuration management for altai.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is optional in the file.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::options::ModelOverrides;
use crate::providers::Provider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,

    /// Command-line harness settings
    pub harness: HarnessConfig,

    /// Per-provider model overrides
    pub providers: ProvidersConfig,
}

impl Config {
    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.altai.altai/config.toml
    /// - Linux: ~/.config/altai/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\altai\altai\config\config.toml
    ///
    /// Falls back to ~/.altai/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "altai", "altai")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                let home = directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."));
                home.join(".altai").join("config.toml")
            })
    }

    /// Overrides configured for `provider`.
    pub fn overrides_for(&self, provider: Provider) -> &ModelOverrides {
        self.providers.get(provider)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
