//! Input normalization: loose caller input to a validated request.

use crate::types::{AltTextFields, AltTextInput, AltTextRequest, ErrorResult};

/// Validate caller input and produce the canonical request shape.
///
/// A non-blank string becomes the image URL as given, with the default
/// transport. An object with a non-blank `imageUrl` passes its fields through
/// unchanged. Everything else is `{ error: "Invalid input" }`.
pub fn normalize_input(input: &AltTextInput) -> Result<AltTextRequest, ErrorResult> {
    match input {
        AltTextInput::Url(url) if !url.trim().is_empty() => Ok(AltTextRequest::new(url.clone())),
        AltTextInput::Fields(AltTextFields {
            image_url: Some(url),
            context,
            code,
            image_transport,
        }) if !url.trim().is_empty() => Ok(AltTextRequest {
            image_url: url.clone(),
            context: context.clone(),
            code: code.clone(),
            image_transport: image_transport.unwrap_or_default(),
        }),
        _ => Err(ErrorResult::invalid_input()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageTransport;

    #[test]
    fn test_string_becomes_request_with_default_transport() {
        for url in ["https://example.com/sun.jpg", "  padded.png ", "x"] {
            let request = normalize_input(&AltTextInput::from(url)).unwrap();
            assert_eq!(request.image_url, url);
            assert_eq!(request.image_transport, ImageTransport::Url);
            assert!(request.context.is_none());
            assert!(request.code.is_none());
        }
    }

    #[test]
    fn test_fields_pass_through() {
        let input = AltTextInput::Fields(AltTextFields {
            image_url: Some("https://example.com/chart.png".to_string()),
            context: Some("Quarterly revenue".to_string()),
            code: Some(String::new()),
            image_transport: Some(ImageTransport::Base64),
        });
        let request = normalize_input(&input).unwrap();
        assert_eq!(request.image_url, "https://example.com/chart.png");
        assert_eq!(request.context.as_deref(), Some("Quarterly revenue"));
        assert_eq!(request.code.as_deref(), Some(""));
        assert_eq!(request.image_transport, ImageTransport::Base64);
    }

    #[test]
    fn test_fields_default_transport() {
        let input = AltTextInput::Fields(AltTextFields {
            image_url: Some("a.png".to_string()),
            ..Default::default()
        });
        assert_eq!(normalize_input(&input).unwrap().image_transport, ImageTransport::Url);
    }

    #[test]
    fn test_request_round_trips_through_input() {
        let request = AltTextRequest::new("https://example.com/logo.svg")
            .with_context("header")
            .with_transport(ImageTransport::Base64);
        assert_eq!(normalize_input(&request.clone().into()).unwrap(), request);
    }

    #[test]
    fn test_invalid_shapes() {
        let invalid = [
            AltTextInput::from(""),
            AltTextInput::from("   "),
            AltTextInput::Fields(AltTextFields::default()),
            AltTextInput::Fields(AltTextFields {
                image_url: Some(" ".to_string()),
                context: Some("ctx".to_string()),
                ..Default::default()
            }),
            AltTextInput::Fields(AltTextFields {
                context: Some("no url".to_string()),
                ..Default::default()
            }),
            AltTextInput::Missing,
            AltTextInput::from(None::<String>),
        ];
        for input in invalid {
            assert_eq!(
                normalize_input(&input),
                Err(ErrorResult::invalid_input()),
                "{input:?}"
            );
        }
    }
}
