//! Google Gemini backend using the `generateContent` REST endpoint.
//!
//! URL images are sent as `fileData` and fetched by Google; inline images
//! go as `inlineData` with their MIME type.

use super::{passthrough, VisionBackend, VisionRequest, VisionResponse};
use crate::error::{AltaiError, Result};
use crate::image::ImagePart;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `generationConfig` keys written by [`GeminiBackend`].
const GENERATION_FIELDS: &[&str] = &["temperature", "maxOutputTokens", "responseMimeType"];

/// Gemini client for one call.
pub struct GeminiBackend {
    api_key: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(client: reqwest::Client, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client,
        }
    }

    fn error(&self, message: String, status_code: Option<u16>) -> AltaiError {
        AltaiError::Provider {
            provider: "Gemini".to_string(),
            message,
            status_code,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    file_uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'a Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let options = &request.options;

        let image_part = match &request.image {
            ImagePart::Url(url) => Part::FileData {
                file_data: FileData { file_uri: url },
            },
            ImagePart::Inline(input) => Part::InlineData {
                inline_data: InlineData {
                    mime_type: &input.media_type,
                    data: &input.data,
                },
            },
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: &options.role,
                parts: vec![
                    Part::Text {
                        text: &request.prompt,
                    },
                    image_part,
                ],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                response_mime_type: &options.response_format,
                extra: passthrough(&options.extra, GENERATION_FIELDS),
            },
        };

        let endpoint = format!(
            "{}/models/{}:generateContent",
            options.base_url.trim_end_matches('/'),
            options.model
        );

        let resp = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.error(format!("request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.error(format!("HTTP {status}: {text}"), Some(status.as_u16())));
        }

        let gen_resp: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| self.error(format!("failed to parse response: {e}"), None))?;

        let tokens_used = gen_resp
            .usage_metadata
            .as_ref()
            .and_then(|u| u.total_token_count);

        Ok(VisionResponse {
            text: gen_resp.text(),
            tokens_used,
        })
    }
}
