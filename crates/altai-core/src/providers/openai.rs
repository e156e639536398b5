//! OpenAI-compatible backend using the Chat Completions API.
//!
//! Serves OpenAI, Groq and Fireworks AI: the wire format is the same, only
//! the base URL, default model, and the name of the token budget field differ.

use super::{passthrough, VisionBackend, VisionRequest, VisionResponse};
use crate::error::{AltaiError, Result};
use crate::image::ImagePart;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Body keys written by [`OpenAiCompatible`]; pass-through options never replace them.
const CHAT_FIELDS: &[&str] = &[
    "model",
    "messages",
    "temperature",
    "max_completion_tokens",
    "max_tokens",
    "response_format",
];

/// Which request field carries the output token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBudgetField {
    /// `max_completion_tokens` (OpenAI, Groq)
    MaxCompletionTokens,
    /// `max_tokens` (Fireworks AI)
    MaxTokens,
}

/// Chat Completions client for one call.
pub struct OpenAiCompatible {
    label: &'static str,
    api_key: String,
    client: reqwest::Client,
    budget_field: TokenBudgetField,
}

impl OpenAiCompatible {
    pub fn new(
        label: &'static str,
        client: reqwest::Client,
        api_key: &str,
        budget_field: TokenBudgetField,
    ) -> Self {
        Self {
            label,
            api_key: api_key.to_string(),
            client,
            budget_field,
        }
    }

    fn error(&self, message: String, status_code: Option<u16>) -> AltaiError {
        AltaiError::Provider {
            provider: self.label.to_string(),
            message,
            status_code,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ChatContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

/// A bare format name becomes `{"type": name}`; objects are sent as given.
fn response_format(format: &Value) -> Value {
    match format {
        Value::String(kind) => json!({ "type": kind }),
        other => other.clone(),
    }
}

fn image_url(image: &ImagePart) -> String {
    match image {
        ImagePart::Url(url) => url.clone(),
        ImagePart::Inline(input) => input.data_url(),
    }
}

#[async_trait]
impl VisionBackend for OpenAiCompatible {
    fn name(&self) -> &str {
        self.label
    }

    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let options = &request.options;
        let (max_completion_tokens, max_tokens) = match self.budget_field {
            TokenBudgetField::MaxCompletionTokens => (Some(options.max_tokens), None),
            TokenBudgetField::MaxTokens => (None, Some(options.max_tokens)),
        };

        let body = ChatRequest {
            model: &options.model,
            messages: vec![ChatMessage {
                role: &options.role,
                content: vec![
                    ChatContent::Text {
                        text: &request.prompt,
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url(&request.image),
                        },
                    },
                ],
            }],
            temperature: options.temperature,
            max_completion_tokens,
            max_tokens,
            response_format: response_format(&options.response_format),
            extra: passthrough(&options.extra, CHAT_FIELDS),
        };

        let endpoint = format!("{}/chat/completions", options.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.error(format!("request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {text}"), Some(status.as_u16())));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| self.error(format!("failed to parse response: {e}"), None))?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(VisionResponse {
            text,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
        })
    }
}
