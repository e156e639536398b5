//! altai core - accessibility alt text from vision LLMs.
//!
//! Sends an image (by URL or inline base64) plus optional page context to a
//! vision-capable model and normalizes the answer into a uniform result,
//! whichever provider produced it.
//!
//! # Architecture
//!
//! ```text
//! Input → Normalize → Resolve options → Prompt (+ image part) → Provider → Reconcile → Result
//! ```
//!
//! Providers: OpenAI, Groq and Fireworks AI (Chat Completions) and Google
//! Gemini (`generateContent`). Credentials are only ever taken from
//! [`ModelOverrides::api_key`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use altai_core::{AltText, AltTextRequest, ModelOverrides};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let overrides = ModelOverrides::default().with_api_key("sk-...");
//!     let request = AltTextRequest::new("https://example.com/chart.png")
//!         .with_context("Quarterly revenue report");
//!
//!     let outcome = AltText::new().openai(request, &overrides).await?;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod input;
pub mod mime;
pub mod options;
pub mod prompt;
pub mod providers;
pub mod reconcile;
pub mod sink;
pub mod types;

// Re-exports for convenient access
pub use client::{
    get_image_alt_text, get_image_alt_text_fireworks, get_image_alt_text_gemini,
    get_image_alt_text_groq, get_image_alt_text_openai, AltText,
};
pub use config::Config;
pub use error::{AltaiError, ConfigError, Result};
pub use options::{ModelOptions, ModelOverrides};
pub use providers::Provider;
pub use sink::{NoopSink, ResultSink, TracingSink};
pub use types::{
    AltTextFields, AltTextInfo, AltTextInput, AltTextOutcome, AltTextRequest, AltTextResult,
    Confidence, ErrorResult, ImageTransport,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
