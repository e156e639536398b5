//! Image transport: how the image reaches the provider.

use crate::error::{AltaiError, Result};
use crate::mime::mime_from_url;
use crate::types::ImageTransport;
use base64::Engine;

/// Base64-encoded image ready to send inline to an LLM API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Encode raw bytes with the given MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Provider-neutral image part. Each adapter maps it onto its own wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePart {
    /// URL reference; the provider fetches it
    Url(String),
    /// Inline bytes fetched here
    Inline(ImageInput),
}

/// Resolve the image part for `image_url` according to `transport`.
///
/// URL transport does no I/O. Base64 transport downloads the image with a
/// plain GET; a network error or non-success status is returned as
/// [`AltaiError::ImageFetch`] without retrying or falling back to URL mode.
pub async fn resolve_image(
    client: &reqwest::Client,
    image_url: &str,
    transport: ImageTransport,
) -> Result<ImagePart> {
    match transport {
        ImageTransport::Url => Ok(ImagePart::Url(image_url.to_string())),
        ImageTransport::Base64 => fetch_inline(client, image_url).await.map(ImagePart::Inline),
    }
}

async fn fetch_inline(client: &reqwest::Client, image_url: &str) -> Result<ImageInput> {
    let fetch_error = |message: String, status_code: Option<u16>| AltaiError::ImageFetch {
        url: image_url.to_string(),
        message,
        status_code,
    };

    let resp = client
        .get(image_url)
        .send()
        .await
        .map_err(|e| fetch_error(format!("request failed: {e}"), None))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {status}"), Some(status.as_u16())));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| fetch_error(format!("failed to read body: {e}"), None))?;

    let media_type = mime_from_url(image_url);
    tracing::debug!(
        url = image_url,
        bytes = bytes.len(),
        media_type,
        "Fetched image for inline transport"
    );

    Ok(ImageInput::from_bytes(&bytes, media_type))
}
