//! End-to-end adapter tests against a local mock provider.

use altai_core::{
    AltText, AltTextFields, AltTextInput, AltTextRequest, AltTextResult, ImageTransport,
    ModelOverrides, Provider,
};
use mockito::Matcher;
use serde_json::json;
use std::sync::{Arc, Mutex};

type Records = Arc<Mutex<Vec<(Provider, AltTextResult)>>>;

fn collecting_client() -> (AltText, Records) {
    let records: Records = Arc::new(Mutex::new(Vec::new()));
    let captured = records.clone();
    let client = AltText::new().with_sink(move |provider: Provider, result: &AltTextResult| {
        captured.lock().unwrap().push((provider, result.clone()));
    });
    (client, records)
}

fn chat_reply(content: &str, total_tokens: u64) -> String {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 1000, "completion_tokens": 50, "total_tokens": total_tokens }
    })
    .to_string()
}

#[tokio::test]
async fn openai_url_transport_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "max_completion_tokens": 2000,
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(
            "```json\n{\"alt\":\"Line chart of monthly signups rising\",\"confidence\":\"high\"}\n```",
            1050,
        ))
        .create_async()
        .await;

    let (client, records) = collecting_client();
    let overrides = ModelOverrides::default()
        .with_api_key("sk-test")
        .with_base_url(server.url());

    let outcome = client
        .openai("https://example.com/signups.png", &overrides)
        .await
        .unwrap();
    mock.assert_async().await;

    let result = outcome.into_success().unwrap();
    assert_eq!(
        result.info.alt.as_deref(),
        Some("Line chart of monthly signups rising.")
    );
    assert_eq!(result.info.confidence.as_deref(), Some("high"));
    assert_eq!(result.model, "gpt-4o-mini");
    assert_eq!(result.tokens, 1050);
    assert_eq!(result.image_transport, ImageTransport::Url);

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, Provider::OpenAi);
    assert_eq!(records[0].1, result);
}

#[tokio::test]
async fn fireworks_base64_transport_fetches_and_inlines_image() {
    let mut server = mockito::Server::new_async().await;
    let image = server
        .mock("GET", "/assets/logo.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body([1u8, 2, 3])
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "accounts/fireworks/models/qwen2p5-vl-7b-instruct",
                "max_tokens": 2000
            })),
            Matcher::Regex(r#""url":"data:image/png;base64,AQID""#.to_string()),
        ]))
        .with_status(200)
        .with_body(chat_reply(r#"{"alt":"Acme logo"}"#, 800))
        .create_async()
        .await;

    let (client, _records) = collecting_client();
    let overrides = ModelOverrides::default()
        .with_api_key("fw-test")
        .with_base_url(server.url());
    let request = AltTextRequest::new(format!("{}/assets/logo.png", server.url()))
        .with_transport(ImageTransport::Base64);

    let outcome = client.fireworks(request, &overrides).await.unwrap();
    image.assert_async().await;
    chat.assert_async().await;

    let result = outcome.into_success().unwrap();
    assert_eq!(result.info.alt.as_deref(), Some("Acme logo."));
    assert_eq!(result.image_transport, ImageTransport::Base64);
}

#[tokio::test]
async fn failed_image_fetch_never_calls_provider() {
    let mut server = mockito::Server::new_async().await;
    let _image = server
        .mock("GET", "/missing.jpg")
        .with_status(404)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let overrides = ModelOverrides::default()
        .with_api_key("gsk-test")
        .with_base_url(server.url());
    let input = AltTextFields {
        image_url: Some(format!("{}/missing.jpg", server.url())),
        image_transport: Some(ImageTransport::Base64),
        ..Default::default()
    };

    let err = AltText::new().groq(input, &overrides).await.unwrap_err();
    chat.assert_async().await;
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn gemini_dispatch_by_function_name() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .match_header("x-goog-api-key", "g-test")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "{\"alt\":\"\",\"decorative_reason\":\"Background texture\"}" }] }
                }],
                "usageMetadata": { "totalTokenCount": 640 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (client, records) = collecting_client();
    let overrides = ModelOverrides::default()
        .with_api_key("g-test")
        .with_base_url(server.url());

    let outcome = client
        .get_image_alt_text("getImageAltTextGoogleAI", "https://example.com/bg.webp", &overrides)
        .await
        .unwrap();
    mock.assert_async().await;

    let result = outcome.success().unwrap();
    assert!(result.info.is_decorative());
    assert_eq!(
        result.info.decorative_reason.as_deref(),
        Some("Background texture.")
    );
    assert_eq!(result.tokens, 640);
    assert_eq!(records.lock().unwrap()[0].0, Provider::Gemini);
}

#[tokio::test]
async fn missing_key_and_unknown_provider_make_no_requests() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (client, records) = collecting_client();
    let no_key = ModelOverrides::default().with_base_url(server.url());

    let outcome = client
        .groq("https://example.com/a.png", &no_key)
        .await
        .unwrap();
    assert_eq!(outcome.error(), Some("GROQ AI APIKEY is required"));

    let with_key = no_key.clone().with_api_key("k");
    let outcome = client
        .get_image_alt_text("anthropic", "https://example.com/a.png", &with_key)
        .await
        .unwrap();
    assert!(outcome.error().unwrap().starts_with("Unknown provider: \"anthropic\""));

    let outcome = client
        .openai(AltTextInput::from("   "), &with_key)
        .await
        .unwrap();
    assert_eq!(outcome.error(), Some("Invalid input"));

    mock.assert_async().await;
    assert!(records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_model_output_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(chat_reply("I cannot see the image.", 12))
        .create_async()
        .await;

    let (client, records) = collecting_client();
    let overrides = ModelOverrides::default()
        .with_api_key("sk-test")
        .with_base_url(server.url());

    let err = client
        .openai("https://example.com/a.png", &overrides)
        .await
        .unwrap_err();
    assert!(matches!(err, altai_core::AltaiError::MalformedOutput { .. }));
    assert!(records.lock().unwrap().is_empty());
}
