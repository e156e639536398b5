//! Public entry points: one adapter per provider plus the name dispatcher.

use crate::error::Result;
use crate::options::ModelOverrides;
use crate::providers::{compute_alt_text, Provider};
use crate::sink::{ResultSink, TracingSink};
use crate::types::{AltTextInput, AltTextOutcome};
use std::sync::Arc;

/// Alt text client.
///
/// Holds the HTTP client and the result sink; everything per-call (options,
/// backend, prompt) is built fresh on each request. Cheap to clone.
#[derive(Clone)]
pub struct AltText {
    http: reqwest::Client,
    sink: Arc<dyn ResultSink>,
}

impl Default for AltText {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AltText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AltText").finish_non_exhaustive()
    }
}

impl AltText {
    /// Client with a default HTTP client that reports to [`TracingSink`].
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the result sink.
    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Replace the HTTP client (proxies, custom TLS, connect timeouts).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Generate alt text with `provider`.
    ///
    /// Returns `Ok(AltTextOutcome::Error)` for a missing API key or invalid
    /// input, without touching the network. Transport failures, provider
    /// HTTP errors and unparseable model output are `Err`.
    pub async fn describe(
        &self,
        provider: Provider,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        let Some(api_key) = overrides.api_key() else {
            let error = provider.missing_key_error();
            tracing::warn!(provider = provider.as_str(), "{}", error.error);
            return Ok(error.into());
        };

        let backend = provider.backend(self.http.clone(), api_key);
        let outcome = compute_alt_text(
            backend.as_ref(),
            &self.http,
            &provider.defaults(),
            &input.into(),
            overrides,
        )
        .await?;

        if let Some(result) = outcome.success() {
            self.sink.record(provider, result);
        }
        Ok(outcome)
    }

    /// OpenAI adapter.
    pub async fn openai(
        &self,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        self.describe(Provider::OpenAi, input, overrides).await
    }

    /// Groq adapter (OpenAI-compatible endpoint).
    pub async fn groq(
        &self,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        self.describe(Provider::Groq, input, overrides).await
    }

    /// Fireworks AI adapter (OpenAI-compatible endpoint).
    pub async fn fireworks(
        &self,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        self.describe(Provider::Fireworks, input, overrides).await
    }

    /// Google Gemini adapter.
    pub async fn gemini(
        &self,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        self.describe(Provider::Gemini, input, overrides).await
    }

    /// Dispatch by provider name.
    ///
    /// Unknown names yield `Ok(AltTextOutcome::Error)` listing the valid ones.
    pub async fn get_image_alt_text(
        &self,
        provider: &str,
        input: impl Into<AltTextInput>,
        overrides: &ModelOverrides,
    ) -> Result<AltTextOutcome> {
        match Provider::from_name(provider) {
            Some(provider) => self.describe(provider, input, overrides).await,
            None => Ok(Provider::unknown_error(provider).into()),
        }
    }
}

/// [`AltText::openai`] with a default client.
pub async fn get_image_alt_text_openai(
    input: impl Into<AltTextInput>,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    AltText::new().openai(input, overrides).await
}

/// [`AltText::groq`] with a default client.
pub async fn get_image_alt_text_groq(
    input: impl Into<AltTextInput>,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    AltText::new().groq(input, overrides).await
}

/// [`AltText::fireworks`] with a default client.
pub async fn get_image_alt_text_fireworks(
    input: impl Into<AltTextInput>,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    AltText::new().fireworks(input, overrides).await
}

/// [`AltText::gemini`] with a default client.
pub async fn get_image_alt_text_gemini(
    input: impl Into<AltTextInput>,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    AltText::new().gemini(input, overrides).await
}

/// [`AltText::get_image_alt_text`] with a default client.
pub async fn get_image_alt_text(
    provider: &str,
    input: impl Into<AltTextInput>,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    AltText::new()
        .get_image_alt_text(provider, input, overrides)
        .await
}
