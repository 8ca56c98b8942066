//! Gemini provider tests against a local mock of the REST API.

use event_ai_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use event_ai_service::services::providers::{GenerationParams, ProviderError, TextProvider};
use secrecy::Secret;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn provider_for(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("test-key".to_string()),
        model: MODEL.to_string(),
        api_base: format!("{}/v1beta", server.uri()),
    })
    .expect("Failed to build provider")
}

fn params() -> GenerationParams {
    GenerationParams {
        temperature: Some(0.7),
    }
}

fn candidate_response(parts: Value, finish_reason: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": finish_reason
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 7,
            "totalTokenCount": 19
        }
    })
}

#[tokio::test]
async fn generate_posts_prompt_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_response(json!([{ "text": "Great event!" }]), "STOP")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .generate("Describe the gala", Some("Annual fundraiser"), &params())
        .await
        .expect("generation failed");

    assert_eq!(response.text, "Great event!");
    assert_eq!(response.input_tokens, 12);
    assert_eq!(response.output_tokens, 7);

    let requests = server.received_requests().await.expect("recording disabled");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("body is not JSON");
    let parts = body["contents"][0]["parts"].as_array().expect("parts missing");
    assert_eq!(parts[0]["text"], "Context: Annual fundraiser");
    assert_eq!(parts[1]["text"], "Describe the gala");
    let temperature = body["generationConfig"]["temperature"]
        .as_f64()
        .expect("temperature missing");
    assert!((temperature - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn generate_concatenates_text_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(
            json!([{ "text": "Part one. " }, { "text": "Part two." }]),
            "STOP",
        )))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .generate("hi", None, &params())
        .await
        .expect("generation failed");

    assert_eq!(response.text, "Part one. Part two.");
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = provider_for(&server).generate("hi", None, &params()).await;

    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[tokio::test]
async fn server_error_maps_to_api_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let result = provider_for(&server).generate("hi", None, &params()).await;

    match result {
        Err(ProviderError::ApiError(msg)) => assert!(msg.contains("backend down")),
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.text)),
    }
}

#[tokio::test]
async fn safety_block_maps_to_content_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })),
        )
        .mount(&server)
        .await;

    let result = provider_for(&server).generate("hi", None, &params()).await;

    assert!(matches!(result, Err(ProviderError::ContentFiltered)));
}

#[tokio::test]
async fn no_candidates_maps_to_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let result = provider_for(&server).generate("hi", None, &params()).await;

    assert!(matches!(result, Err(ProviderError::EmptyResponse)));
}

#[tokio::test]
async fn unreachable_api_maps_to_network_error() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("Failed to reserve port")
        .port();
    let provider = GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("test-key".to_string()),
        model: MODEL.to_string(),
        api_base: format!("http://127.0.0.1:{}/v1beta", port),
    })
    .expect("Failed to build provider");

    let result = provider.generate("hi", None, &params()).await;

    assert!(matches!(result, Err(ProviderError::NetworkError(_))));
}
