use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

/// Insight type assumed when the caller omits one.
pub const DEFAULT_INSIGHT_TYPE: &str = "general";

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateTextRequest {
    #[validate(custom(function = "not_blank", message = "Prompt cannot be empty"))]
    pub prompt: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// `event_data` is free-form; only its shape is checked, during deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateEventInsightRequest {
    pub event_data: Map<String, Value>,
    #[serde(default = "default_insight_type")]
    pub insight_type: String,
}

fn default_insight_type() -> String {
    DEFAULT_INSIGHT_TYPE.to_string()
}

// Whitespace-only prompts count as empty.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of both relay endpoints: the generated text, or `null` when nothing came back.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationResponse {
    pub result: Option<String>,
}
