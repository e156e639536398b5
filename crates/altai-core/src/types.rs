//! Core data types for alt text requests and results.
//!
//! Field names on the wire follow the camelCase shape callers already use
//! (`imageUrl`, `totalTime`, `imageTransport`), while the model payload in
//! [`AltTextInfo`] keeps the snake_case keys the prompt asks for.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// How the image reaches the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTransport {
    /// The provider fetches the image from its URL
    #[default]
    Url,
    /// The image bytes are fetched locally and sent inline as base64
    Base64,
}

impl ImageTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Base64 => "base64",
        }
    }
}

impl std::fmt::Display for ImageTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "base64" => Ok(Self::Base64),
            other => Err(format!("unknown image transport '{other}' (expected url or base64)")),
        }
    }
}

/// Raw, unvalidated input accepted by every provider adapter.
///
/// Mirrors the loose shapes callers send: a bare URL string, an object with
/// an `imageUrl` field, or nothing at all. Deserializes from a JSON string,
/// object, or `null` respectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AltTextInput {
    /// A bare image URL
    Url(String),
    /// An object form, possibly missing its URL
    Fields(AltTextFields),
    /// No input (`null`)
    #[default]
    Missing,
}

/// Object form of [`AltTextInput`]. Every field is optional until normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltTextFields {
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, alias = "image_transport", skip_serializing_if = "Option::is_none")]
    pub image_transport: Option<ImageTransport>,
}

impl From<&str> for AltTextInput {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl From<String> for AltTextInput {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<AltTextFields> for AltTextInput {
    fn from(fields: AltTextFields) -> Self {
        Self::Fields(fields)
    }
}

impl From<AltTextRequest> for AltTextInput {
    fn from(request: AltTextRequest) -> Self {
        Self::Fields(AltTextFields {
            image_url: Some(request.image_url),
            context: request.context,
            code: request.code,
            image_transport: Some(request.image_transport),
        })
    }
}

impl<T: Into<AltTextInput>> From<Option<T>> for AltTextInput {
    fn from(input: Option<T>) -> Self {
        input.map(Into::into).unwrap_or(Self::Missing)
    }
}

/// A validated alt text request.
///
/// `image_url` is guaranteed non-empty after trimming once produced by
/// [`normalize_input`](crate::input::normalize_input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltTextRequest {
    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default)]
    pub image_transport: ImageTransport,
}

impl AltTextRequest {
    /// Create a request for an image URL with the default transport.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            context: None,
            code: None,
            image_transport: ImageTransport::default(),
        }
    }

    /// Sets surrounding page context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the source markup the image appears in.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the image transport.
    pub fn with_transport(mut self, transport: ImageTransport) -> Self {
        self.image_transport = transport;
        self
    }
}

/// Model confidence in the generated alt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown confidence level '{other}'")),
        }
    }
}

/// Alt text payload parsed from the model's JSON answer.
///
/// Every field is optional: the model output is only required to be a JSON
/// object. Keys the prompt does not ask for, and known keys with an
/// unexpected type, are kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AltTextInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorative_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<Vec<String>>,

    /// Raw confidence label; see [`AltTextInfo::confidence_level`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AltTextInfo {
    /// Typed confidence, if the model returned one of low/medium/high.
    pub fn confidence_level(&self) -> Option<Confidence> {
        self.confidence.as_deref().and_then(|c| c.parse().ok())
    }

    /// True when the model classified the image as decorative (`alt=""`).
    pub fn is_decorative(&self) -> bool {
        matches!(self.alt.as_deref(), Some(""))
    }
}

/// Successful alt text generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltTextResult {
    pub info: AltTextInfo,

    /// Model identifier the request was sent with
    pub model: String,

    /// Total tokens reported by the provider (0 when not reported)
    pub tokens: u64,

    /// Wall time of the model call in milliseconds
    pub total_time: f64,

    pub image_transport: ImageTransport,
}

/// Validation failure returned as a value rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn invalid_input() -> Self {
        Self::new("Invalid input")
    }
}

/// What an adapter hands back when it did not fail hard.
///
/// Serializes to exactly one of the two shapes: either the full result or
/// `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AltTextOutcome {
    Error(ErrorResult),
    Success(AltTextResult),
}

impl AltTextOutcome {
    /// The error message, if this is an error outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(e) => Some(&e.error),
            Self::Success(_) => None,
        }
    }

    pub fn success(&self) -> Option<&AltTextResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Error(_) => None,
        }
    }

    pub fn into_success(self) -> Option<AltTextResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Error(_) => None,
        }
    }
}

impl From<ErrorResult> for AltTextOutcome {
    fn from(error: ErrorResult) -> Self {
        Self::Error(error)
    }
}

impl From<AltTextResult> for AltTextOutcome {
    fn from(result: AltTextResult) -> Self {
        Self::Success(result)
    }
}
