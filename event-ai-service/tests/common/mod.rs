#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use event_ai_service::config::{CorsConfig, EventAiConfig, GeminiSettings};
use event_ai_service::services::GeminiService;
use event_ai_service::startup::{router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> EventAiConfig {
    EventAiConfig {
        common: service_core::config::Config {
            port: 0, // Random port
            ..Default::default()
        },
        gemini: GeminiSettings::default(),
        cors: CorsConfig::default(),
        otlp_endpoint: None,
    }
}

pub fn state_with(gemini: GeminiService) -> AppState {
    AppState {
        config: test_config(),
        gemini: Arc::new(gemini),
    }
}

/// POST a JSON body through the full router and return status plus parsed body.
pub async fn post_json(state: AppState, path: &str, body: Value) -> (StatusCode, Value) {
    post_raw(state, path, Some("application/json"), &body.to_string()).await
}

/// POST raw bytes with an optional content type. The body is parsed as JSON
/// when possible and `Value::Null` otherwise.
pub async fn post_raw(
    state: AppState,
    path: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri(path);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = router(state)
        .oneshot(
            request
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
        .expect("Router failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
