//! Provider adapters for vision LLM APIs.
//!
//! OpenAI, Groq and Fireworks AI speak the same Chat Completions format and
//! share [`openai::OpenAiCompatible`]; Gemini has its own request and response
//! envelope in [`gemini::GeminiBackend`]. Everything around the HTTP call
//! (option resolution, input validation, prompt, image transport, timing,
//! reconciliation) is shared in [`compute_alt_text`].

pub(crate) mod gemini;
pub(crate) mod openai;

use crate::error::Result;
use crate::image::{resolve_image, ImagePart};
use crate::input::normalize_input;
use crate::options::{ModelOptions, ModelOverrides};
use crate::prompt::alt_text_prompt;
use crate::reconcile::reconcile;
use crate::types::{AltTextInput, AltTextOutcome, AltTextResult, ErrorResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::time::Instant;

pub use gemini::GeminiBackend;
pub use openai::{OpenAiCompatible, TokenBudgetField};

/// A fully built request for one model call.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Resolved model options
    pub options: ModelOptions,
    /// Prompt text
    pub prompt: String,
    /// The image, by URL or inline
    pub image: ImagePart,
}

/// What a backend extracts from the provider's response envelope.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Raw model text, possibly fenced
    pub text: String,
    /// Total tokens (input + output), if reported
    pub tokens_used: Option<u64>,
}

/// Trait that all provider backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionBackend>` for the provider dispatch table).
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Send the request and extract text and token usage.
    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse>;
}

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI Chat Completions
    OpenAi,
    /// Groq, OpenAI-compatible endpoint
    Groq,
    /// Fireworks AI, OpenAI-compatible endpoint
    Fireworks,
    /// Google Gemini
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Groq,
        Provider::Fireworks,
        Provider::Gemini,
    ];

    /// Short identifier, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
            Provider::Fireworks => "fireworks",
            Provider::Gemini => "gemini",
        }
    }

    /// Human-readable name for logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI API",
            Provider::Groq => "Groq AI with OpenAI API",
            Provider::Fireworks => "Fireworks AI with OpenAI API",
            Provider::Gemini => "Gemini AI with Google API",
        }
    }

    /// Name of the exported entry point this provider is also known by.
    pub fn function_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "getImageAltTextOpenAI",
            Provider::Groq => "getImageAltTextGroqAIOpenAI",
            Provider::Fireworks => "getImageAltTextFireworksAIOpenAI",
            Provider::Gemini => "getImageAltTextGoogleAI",
        }
    }

    /// Environment variable a harness conventionally reads the key from.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_AI_API_KEY",
            Provider::Fireworks => "FIREWORKS_AI_API_KEY",
            Provider::Gemini => "GOOGLE_AI_API_KEY",
        }
    }

    /// Look up a provider by short name or entry point name.
    pub fn from_name(name: &str) -> Option<Provider> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.function_name() == name || p.as_str().eq_ignore_ascii_case(name))
            .or_else(|| name.eq_ignore_ascii_case("google").then_some(Provider::Gemini))
    }

    /// Value returned when no usable API key was supplied.
    pub fn missing_key_error(&self) -> ErrorResult {
        let label = match self {
            Provider::OpenAi => "OPENAI",
            Provider::Groq => "GROQ AI",
            Provider::Fireworks => "FIREWORKS AI",
            Provider::Gemini => "GOOGLE AI",
        };
        ErrorResult::new(format!("{label} APIKEY is required"))
    }

    /// Value returned by the dispatcher for a name that matches no provider.
    pub fn unknown_error(name: &str) -> ErrorResult {
        let known: Vec<&str> = Self::ALL.iter().map(Provider::as_str).collect();
        ErrorResult::new(format!(
            "Unknown provider: \"{name}\". Use one of: {}.",
            known.join(", ")
        ))
    }

    /// The provider's fixed default model options.
    pub fn defaults(&self) -> ModelOptions {
        let (base_url, model, response_format) = match self {
            Provider::OpenAi => ("https://api.openai.com/v1", "gpt-4o-mini", "json_object"),
            Provider::Groq => (
                "https://api.groq.com/openai/v1",
                "meta-llama/llama-4-scout-17b-16e-instruct",
                "json_object",
            ),
            Provider::Fireworks => (
                "https://api.fireworks.ai/inference/v1",
                "accounts/fireworks/models/qwen2p5-vl-7b-instruct",
                "json_object",
            ),
            Provider::Gemini => (
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.5-flash",
                "application/json",
            ),
        };

        ModelOptions {
            base_url: base_url.to_string(),
            model: model.to_string(),
            role: "user".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            response_format: Value::String(response_format.to_string()),
            extra: Map::new(),
        }
    }

    /// Build a fresh backend for one call.
    pub fn backend(&self, client: reqwest::Client, api_key: &str) -> Box<dyn VisionBackend> {
        match self {
            Provider::OpenAi => Box::new(OpenAiCompatible::new(
                "OpenAI",
                client,
                api_key,
                TokenBudgetField::MaxCompletionTokens,
            )),
            Provider::Groq => Box::new(OpenAiCompatible::new(
                "Groq",
                client,
                api_key,
                TokenBudgetField::MaxCompletionTokens,
            )),
            Provider::Fireworks => Box::new(OpenAiCompatible::new(
                "Fireworks AI",
                client,
                api_key,
                TokenBudgetField::MaxTokens,
            )),
            Provider::Gemini => Box::new(GeminiBackend::new(client, api_key)),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ErrorResult;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Provider::from_name(s).ok_or_else(|| Provider::unknown_error(s))
    }
}

/// Copy of `extra` without the keys a backend already writes itself.
pub(crate) fn passthrough(extra: &Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| {
            let taken = reserved.contains(&key.as_str());
            if taken {
                tracing::debug!("Skipping pass-through option '{key}': set by the request");
            }
            !taken
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Shared flow around a single backend call.
///
/// Resolves options, validates input (returned as an error value when
/// invalid), builds the prompt, resolves the image part, times the model
/// call, and reconciles its text. Transport and parse failures propagate.
pub async fn compute_alt_text(
    backend: &dyn VisionBackend,
    client: &reqwest::Client,
    defaults: &ModelOptions,
    input: &AltTextInput,
    overrides: &ModelOverrides,
) -> Result<AltTextOutcome> {
    let options = ModelOptions::resolve(defaults, overrides);

    let request = match normalize_input(input) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(provider = backend.name(), "Rejected input: {}", error.error);
            return Ok(error.into());
        }
    };

    let prompt = alt_text_prompt(request.context.as_deref(), request.code.as_deref());
    let image = resolve_image(client, &request.image_url, request.image_transport).await?;

    tracing::debug!(
        provider = backend.name(),
        model = %options.model,
        transport = %request.image_transport,
        "Requesting alt text for {}",
        request.image_url
    );

    let model = options.model.clone();
    let vision_request = VisionRequest {
        options,
        prompt,
        image,
    };

    let start = Instant::now();
    let response = backend.generate(&vision_request).await?;
    let total_time = start.elapsed().as_secs_f64() * 1000.0;

    let tokens = response.tokens_used.unwrap_or_else(|| {
        tracing::debug!(provider = backend.name(), "Provider did not report token usage");
        0
    });
    let info = reconcile(&response.text)?;

    Ok(AltTextResult {
        info,
        model,
        tokens,
        total_time,
        image_transport: request.image_transport,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AltaiError;
    use crate::types::{AltTextFields, ImageTransport};
    use std::sync::{Arc, Mutex};

    /// Backend that records the request it saw and replies with canned text.
    struct MockBackend {
        reply: std::result::Result<VisionResponse, String>,
        seen: Arc<Mutex<Vec<VisionRequest>>>,
    }

    impl MockBackend {
        fn replying(text: &str, tokens: Option<u64>) -> Self {
            Self {
                reply: Ok(VisionResponse {
                    text: text.to_string(),
                    tokens_used: tokens,
                }),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl VisionBackend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|message| AltaiError::Provider {
                provider: "mock".to_string(),
                message,
                status_code: Some(500),
            })
        }
    }

    #[test]
    fn test_from_name_accepts_short_and_function_names() {
        assert_eq!(Provider::from_name("openai"), Some(Provider::OpenAi));
        assert_eq!(Provider::from_name("Groq"), Some(Provider::Groq));
        assert_eq!(Provider::from_name("google"), Some(Provider::Gemini));
        for provider in Provider::ALL {
            assert_eq!(Provider::from_name(provider.function_name()), Some(provider));
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
        assert_eq!(Provider::from_name("bogus"), None);
    }

    #[test]
    fn test_unknown_provider_message() {
        let err = "bogus".parse::<Provider>().unwrap_err();
        assert_eq!(
            err.error,
            "Unknown provider: \"bogus\". Use one of: openai, groq, fireworks, gemini."
        );
    }

    #[test]
    fn test_missing_key_labels() {
        assert_eq!(Provider::OpenAi.missing_key_error().error, "OPENAI APIKEY is required");
        assert_eq!(Provider::Groq.missing_key_error().error, "GROQ AI APIKEY is required");
        assert_eq!(
            Provider::Fireworks.missing_key_error().error,
            "FIREWORKS AI APIKEY is required"
        );
        assert_eq!(Provider::Gemini.missing_key_error().error, "GOOGLE AI APIKEY is required");
    }

    #[test]
    fn test_defaults() {
        let gemini = Provider::Gemini.defaults();
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.response_format, "application/json");

        let fireworks = Provider::Fireworks.defaults();
        assert_eq!(fireworks.base_url, "https://api.fireworks.ai/inference/v1");
        assert_eq!(fireworks.max_tokens, 2000);
        assert_eq!(fireworks.temperature, 0.2);
    }

    #[test]
    fn test_passthrough_skips_reserved_keys() {
        let mut extra = Map::new();
        extra.insert("seed".to_string(), Value::from(7));
        extra.insert("model".to_string(), Value::from("shadow"));
        let kept = passthrough(&extra, &["model", "messages"]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept["seed"], Value::from(7));
    }

    #[tokio::test]
    async fn test_compute_builds_request_and_reconciles() {
        let backend = MockBackend::replying("```json\n{\"alt\":\"Sun over hills\",\"confidence\":\"high\"}\n```", Some(321));
        let seen = backend.seen.clone();
        let input = AltTextInput::Fields(AltTextFields {
            image_url: Some("https://example.com/sun.jpg".to_string()),
            context: Some("Billing page".to_string()),
            ..Default::default()
        });
        let overrides = ModelOverrides::default().with_model("gpt-4o");

        let outcome = compute_alt_text(
            &backend,
            &reqwest::Client::new(),
            &Provider::OpenAi.defaults(),
            &input,
            &overrides,
        )
        .await
        .unwrap();

        let result = outcome.into_success().unwrap();
        assert_eq!(result.model, "gpt-4o");
        assert_eq!(result.tokens, 321);
        assert_eq!(result.image_transport, ImageTransport::Url);
        assert!(result.total_time >= 0.0);
        assert_eq!(result.info.alt.as_deref(), Some("Sun over hills."));
        assert_eq!(result.info.confidence.as_deref(), Some("high"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].image, ImagePart::Url("https://example.com/sun.jpg".to_string()));
        assert!(seen[0].prompt.contains("Context:\n  Billing page"));
        assert_eq!(seen[0].options.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_compute_invalid_input_skips_backend() {
        let backend = MockBackend::replying("{}", None);
        let seen = backend.seen.clone();

        let outcome = compute_alt_text(
            &backend,
            &reqwest::Client::new(),
            &Provider::Groq.defaults(),
            &AltTextInput::from(""),
            &ModelOverrides::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.error(), Some("Invalid input"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compute_missing_usage_counts_zero() {
        let backend = MockBackend::replying(r#"{"alt":"Search"}"#, None);
        let outcome = compute_alt_text(
            &backend,
            &reqwest::Client::new(),
            &Provider::Gemini.defaults(),
            &AltTextInput::from("https://example.com/search.svg"),
            &ModelOverrides::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.success().unwrap().tokens, 0);
    }

    #[tokio::test]
    async fn test_compute_propagates_backend_and_parse_failures() {
        let input = AltTextInput::from("https://example.com/sun.jpg");
        let client = reqwest::Client::new();
        let defaults = Provider::OpenAi.defaults();

        let err = compute_alt_text(
            &MockBackend::failing("boom"),
            &client,
            &defaults,
            &input,
            &ModelOverrides::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), Some(500));

        let err = compute_alt_text(
            &MockBackend::replying("not json", Some(1)),
            &client,
            &defaults,
            &input,
            &ModelOverrides::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AltaiError::MalformedOutput { .. }));
    }
}
