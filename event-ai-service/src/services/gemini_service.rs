//! Generation relay.
//!
//! [`GeminiService`] owns the single provider handle for the process. It turns
//! a prompt, or an event's fields, into one provider call and hands back the
//! text. Provider faults are logged and collapsed into `None`.

use crate::config::GeminiSettings;
use crate::models::prompt::build_insight_prompt;
use crate::services::metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Temperature used for every relay call unless the caller overrides it.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub struct GeminiService {
    provider: Option<Arc<dyn TextProvider>>,
    has_credential: bool,
    model: String,
}

impl GeminiService {
    /// Configure the relay from settings. Never fails: a missing credential or
    /// a client that cannot be built leaves the service unconfigured.
    pub fn from_config(settings: &GeminiSettings) -> Self {
        let model = settings.model.clone();

        let api_key = match settings.api_key.as_ref() {
            Some(key) if settings.has_credential() => key.clone(),
            _ => {
                tracing::warn!("GEMINI_API_KEY not found. Gemini service disabled.");
                return Self {
                    provider: None,
                    has_credential: false,
                    model,
                };
            }
        };

        let provider = GeminiTextProvider::new(GeminiConfig {
            api_key,
            model: model.clone(),
            api_base: settings.api_base.clone(),
        });

        match provider {
            Ok(provider) => {
                tracing::info!(model = %model, "Gemini AI configured with model: {}", model);
                Self {
                    provider: Some(Arc::new(provider)),
                    has_credential: true,
                    model,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to configure Gemini AI");
                Self {
                    provider: None,
                    has_credential: true,
                    model,
                }
            }
        }
    }

    /// Relay through an already-built provider.
    pub fn with_provider(provider: Arc<dyn TextProvider>) -> Self {
        let model = provider.model().to_string();
        Self {
            provider: Some(provider),
            has_credential: true,
            model,
        }
    }

    /// A relay with no credential.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            has_credential: false,
            model: String::new(),
        }
    }

    /// Whether a provider handle is ready to accept calls.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Whether a credential was supplied, regardless of whether the client came up.
    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text for `prompt`, optionally preceded by `context`.
    ///
    /// Returns `None` when unconfigured (without network I/O) or when the
    /// provider call fails for any reason.
    pub async fn generate_text(
        &self,
        prompt: &str,
        context: Option<&str>,
        temperature: f32,
    ) -> Option<String> {
        self.relay("generate", prompt, context, temperature).await
    }

    /// Generate improvement insights for an event described by `event_data`.
    pub async fn generate_event_insights(
        &self,
        event_data: &Map<String, Value>,
        insight_type: &str,
    ) -> Option<String> {
        if !self.is_configured() {
            metrics::record_relay_outcome("insight", "unavailable");
            return None;
        }

        tracing::debug!(insight_type = %insight_type, "Building event insight prompt");
        let prompt = build_insight_prompt(event_data);

        self.relay("insight", &prompt, None, DEFAULT_TEMPERATURE)
            .await
    }

    async fn relay(
        &self,
        operation: &str,
        prompt: &str,
        context: Option<&str>,
        temperature: f32,
    ) -> Option<String> {
        let Some(provider) = self.provider.as_ref() else {
            tracing::warn!("Attempted to use Gemini service but it's not configured.");
            metrics::record_relay_outcome(operation, "unavailable");
            return None;
        };

        let params = GenerationParams {
            temperature: Some(temperature),
        };

        let start = Instant::now();
        let result = provider.generate(prompt, context, &params).await;
        metrics::record_provider_latency(
            provider.name(),
            provider.model(),
            start.elapsed().as_secs_f64(),
        );

        match result {
            Ok(response) => {
                metrics::record_tokens(
                    provider.model(),
                    response.input_tokens,
                    response.output_tokens,
                );
                metrics::record_relay_outcome(operation, "text");
                tracing::info!(
                    operation = %operation,
                    provider = provider.name(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Generation completed"
                );
                Some(response.text)
            }
            Err(e) => {
                metrics::record_provider_error(provider.name(), e.kind());
                metrics::record_relay_outcome(operation, "empty");
                tracing::error!(
                    operation = %operation,
                    provider = provider.name(),
                    error = %e,
                    "Gemini generation error"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderError;
    use secrecy::Secret;
    use serde_json::json;

    fn event(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn missing_credential_leaves_service_unconfigured() {
        let service = GeminiService::from_config(&GeminiSettings::default());
        assert!(!service.is_configured());
        assert!(!service.has_credential());
    }

    #[test]
    fn credential_configures_gemini_provider() {
        let settings = GeminiSettings {
            api_key: Some(Secret::new("key".to_string())),
            model: "gemini-test".to_string(),
            ..GeminiSettings::default()
        };

        let service = GeminiService::from_config(&settings);

        assert!(service.is_configured());
        assert!(service.has_credential());
        assert_eq!(service.model(), "gemini-test");
    }

    #[tokio::test]
    async fn unconfigured_generate_returns_none() {
        let service = GeminiService::disabled();
        assert_eq!(service.generate_text("hi", None, DEFAULT_TEMPERATURE).await, None);
        assert_eq!(
            service
                .generate_event_insights(&event(json!({})), "general")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let mock = Arc::new(MockTextProvider::succeeding("  Line one\nLine two  "));
        let service = GeminiService::with_provider(mock.clone());

        let result = service
            .generate_text("Describe the fair", Some("Spring"), DEFAULT_TEMPERATURE)
            .await;

        assert_eq!(result.as_deref(), Some("  Line one\nLine two  "));
        let call = mock.last_call().unwrap();
        assert_eq!(call.prompt, "Describe the fair");
        assert_eq!(call.context.as_deref(), Some("Spring"));
        assert_eq!(call.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[tokio::test]
    async fn provider_failure_becomes_none() {
        let mock = Arc::new(MockTextProvider::failing(|| {
            ProviderError::NetworkError("connection reset".to_string())
        }));
        let service = GeminiService::with_provider(mock.clone());

        assert_eq!(service.generate_text("hi", None, 0.2).await, None);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn insights_relay_templated_prompt_once() {
        let mock = Arc::new(MockTextProvider::succeeding("insights"));
        let service = GeminiService::with_provider(mock.clone());
        let data = event(json!({ "title": "Chess Club", "category": "Games" }));

        let result = service.generate_event_insights(&data, "general").await;

        assert_eq!(result.as_deref(), Some("insights"));
        assert_eq!(mock.call_count(), 1);
        let call = mock.last_call().unwrap();
        assert!(call.prompt.contains("Title: Chess Club"));
        assert!(call.prompt.contains("Description: None"));
        assert!(call.prompt.contains("Category: Games"));
        assert_eq!(call.context, None);
        assert_eq!(call.temperature, Some(DEFAULT_TEMPERATURE));
    }
}
