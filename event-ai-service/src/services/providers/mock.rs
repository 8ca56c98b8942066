//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A call observed by [`MockTextProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub context: Option<String>,
    pub temperature: Option<f32>,
}

enum Behavior {
    Succeed(String),
    Fail(fn() -> ProviderError),
    Panic(&'static str),
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MockTextProvider {
    /// Provider that answers every prompt with `text`.
    pub fn succeeding(text: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Succeed(text.into()))
    }

    /// Provider whose every call fails with the error built by `error`.
    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    /// Provider that panics inside `generate`, for exercising the handler-level catch.
    pub fn panicking(message: &'static str) -> Self {
        Self::with_behavior(Behavior::Panic(message))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call
            .lock()
            .map(|call| (*call).clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some(RecordedCall {
                prompt: prompt.to_string(),
                context: context.map(str::to_string),
                temperature: params.temperature,
            });
        }

        match &self.behavior {
            Behavior::Succeed(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: estimate_tokens(prompt.len()),
                output_tokens: estimate_tokens(text.len()),
            }),
            Behavior::Fail(error) => Err(error()),
            Behavior::Panic(message) => panic!("{}", message),
        }
    }
}

/// Rough four-bytes-per-token estimate, saturating at `i32::MAX`.
fn estimate_tokens(len: usize) -> i32 {
    i32::try_from(len / 4).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_saturates_instead_of_wrapping() {
        assert_eq!(estimate_tokens(usize::MAX), i32::MAX);
        assert_eq!(estimate_tokens(i32::MAX as usize * 4 + 8), i32::MAX);
    }

    #[tokio::test]
    async fn success_reports_estimated_tokens() {
        let mock = MockTextProvider::succeeding("12345678");
        let response = mock
            .generate("abcdefghijkl", None, &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(response.input_tokens, 3);
        assert_eq!(response.output_tokens, 2);
        assert_eq!(mock.call_count(), 1);
    }
}
