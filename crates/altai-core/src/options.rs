//! Model options: provider defaults merged with caller overrides.
//!
//! Every provider ships a complete [`ModelOptions`] as its defaults. Callers
//! pass a [`ModelOverrides`] where every field is optional; resolution is a
//! field-by-field "override if set, else default". Keys neither side knows
//! about travel in `extra` and are forwarded into the provider request body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fully resolved options for one provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// API base URL (e.g. `https://api.openai.com/v1`)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Message role the prompt is sent as
    pub role: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Output token budget
    pub max_tokens: u32,

    /// Response format, forwarded as given.
    ///
    /// A plain string is a format name (`json_object`) for chat APIs or a MIME
    /// type for Gemini. An object (`{"type":"json_schema","json_schema":{..}}`)
    /// is sent verbatim.
    pub response_format: Value,

    /// Pass-through options with no dedicated field.
    ///
    /// Forwarded into the request body unchanged, except for keys the
    /// backend already sets itself, which are skipped.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelOptions {
    /// Merge `defaults` with `overrides`; any override that is set wins.
    ///
    /// Pure and idempotent: resolving the result again with empty overrides
    /// returns it unchanged.
    pub fn resolve(defaults: &ModelOptions, overrides: &ModelOverrides) -> ModelOptions {
        let mut extra = defaults.extra.clone();
        extra.extend(overrides.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        ModelOptions {
            base_url: pick(&overrides.base_url, &defaults.base_url),
            model: pick(&overrides.model, &defaults.model),
            role: pick(&overrides.role, &defaults.role),
            temperature: overrides.temperature.unwrap_or(defaults.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(defaults.max_tokens),
            response_format: overrides
                .response_format
                .clone()
                .unwrap_or_else(|| defaults.response_format.clone()),
            extra,
        }
    }
}

fn pick(over: &Option<String>, default: &str) -> String {
    over.clone().unwrap_or_else(|| default.to_string())
}

/// Caller-supplied overrides. Unset fields fall back to provider defaults.
///
/// Accepts the key spellings of each provider's native API, so a JSON object
/// written for one SDK (`apiKey`, `baseURL`, `max_completion_tokens`,
/// `maxOutputTokens`, `responseMimeType`) maps onto the same fields. When an
/// object carries several spellings of one field, the snake_case name wins;
/// after it come `apiKey`, then `baseURL` before `baseUrl`, then
/// `max_completion_tokens`, `maxOutputTokens` and `maxTokens` in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOverrides")]
pub struct ModelOverrides {
    /// Provider API key; required by every adapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelOverrides {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, response_format: impl Into<Value>) -> Self {
        self.response_format = Some(response_format.into());
        self
    }

    /// Layer `top` over `self`: fields set in `top` win.
    pub fn merged_with(&self, top: &ModelOverrides) -> ModelOverrides {
        let mut extra = self.extra.clone();
        extra.extend(top.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        ModelOverrides {
            api_key: top.api_key.clone().or_else(|| self.api_key.clone()),
            base_url: top.base_url.clone().or_else(|| self.base_url.clone()),
            model: top.model.clone().or_else(|| self.model.clone()),
            role: top.role.clone().or_else(|| self.role.clone()),
            temperature: top.temperature.or(self.temperature),
            max_tokens: top.max_tokens.or(self.max_tokens),
            response_format: top
                .response_format
                .clone()
                .or_else(|| self.response_format.clone()),
            extra,
        }
    }

    /// The API key, treating an empty or blank string as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Wire shape of [`ModelOverrides`], one field per accepted spelling.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawOverrides {
    api_key: Option<String>,
    #[serde(rename = "apiKey")]
    api_key_camel: Option<String>,

    base_url: Option<String>,
    #[serde(rename = "baseURL")]
    base_url_upper: Option<String>,
    #[serde(rename = "baseUrl")]
    base_url_camel: Option<String>,

    model: Option<String>,
    role: Option<String>,
    temperature: Option<f32>,

    max_tokens: Option<u32>,
    max_completion_tokens: Option<u32>,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "maxTokens")]
    max_tokens_camel: Option<u32>,

    response_format: Option<Value>,
    #[serde(rename = "responseMimeType")]
    response_mime_type: Option<Value>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawOverrides> for ModelOverrides {
    fn from(raw: RawOverrides) -> Self {
        Self {
            api_key: raw.api_key.or(raw.api_key_camel),
            base_url: raw.base_url.or(raw.base_url_upper).or(raw.base_url_camel),
            model: raw.model,
            role: raw.role,
            temperature: raw.temperature,
            max_tokens: raw
                .max_tokens
                .or(raw.max_completion_tokens)
                .or(raw.max_output_tokens)
                .or(raw.max_tokens_camel),
            response_format: raw.response_format.or(raw.response_mime_type),
            extra: raw.extra,
        }
    }
}
