//! Configuration section types and their defaults.

use crate::options::ModelOverrides;
use crate::providers::Provider;
use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Settings for the command-line harness around the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Per-call timeout in milliseconds, applied by the caller
    pub timeout_ms: u64,

    /// Provider used when none is given on the command line
    pub provider: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            provider: Provider::OpenAi.as_str().to_string(),
        }
    }
}

/// Per-provider overrides, one table each.
///
/// `api_key` values may use `${VAR}` syntax; the harness expands them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: ModelOverrides,
    pub groq: ModelOverrides,
    pub fireworks: ModelOverrides,
    pub gemini: ModelOverrides,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        let env_key =
            |p: Provider| ModelOverrides::default().with_api_key(format!("${{{}}}", p.api_key_env()));
        Self {
            openai: env_key(Provider::OpenAi),
            groq: env_key(Provider::Groq),
            fireworks: env_key(Provider::Fireworks),
            gemini: env_key(Provider::Gemini),
        }
    }
}

impl ProvidersConfig {
    /// Overrides configured for `provider`.
    pub fn get(&self, provider: Provider) -> &ModelOverrides {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Groq => &self.groq,
            Provider::Fireworks => &self.fireworks,
            Provider::Gemini => &self.gemini,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Provider, &ModelOverrides)> {
        Provider::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}
