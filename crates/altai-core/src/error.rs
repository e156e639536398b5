//! Error types for alt text generation.
//!
//! Only hard failures live here. Validation problems (missing API key, invalid
//! input, unknown provider) are returned to the caller as an
//! [`ErrorResult`](crate::types::ErrorResult) value instead.

use thiserror::Error;

/// Top-level error type for altai operations.
#[derive(Error, Debug)]
pub enum AltaiError {
    /// Fetching the image for base64 transport failed
    #[error("Image fetch failed for {url}: {message}")]
    ImageFetch {
        url: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The provider API call failed or returned a non-success status
    #[error("{provider} error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The model answered with something that is not a JSON object
    #[error("Malformed model output: {message}")]
    MalformedOutput { message: String },
}

impl AltaiError {
    /// HTTP status code attached to the failure, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ImageFetch { status_code, .. } | Self::Provider { status_code, .. } => {
                *status_code
            }
            _ => None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for altai results.
pub type Result<T> = std::result::Result<T, AltaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = AltaiError::Provider {
            provider: "OpenAI".to_string(),
            message: "HTTP 401 Unauthorized: bad key".to_string(),
            status_code: Some(401),
        };
        assert_eq!(err.to_string(), "OpenAI error: HTTP 401 Unauthorized: bad key");
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_malformed_output_has_no_status() {
        let err = AltaiError::MalformedOutput {
            message: "expected a JSON object".to_string(),
        };
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("harness.timeout_ms must be > 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: harness.timeout_ms must be > 0"
        );
    }
}
