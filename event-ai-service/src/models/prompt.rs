//! Prompt construction.

use serde_json::{Map, Value};

/// How a missing or null event field is rendered inside a prompt.
pub const ABSENT_FIELD: &str = "None";

/// Render one event field for embedding in a prompt.
///
/// Strings are embedded verbatim, missing keys and `null` become [`ABSENT_FIELD`],
/// anything else is embedded as compact JSON.
pub fn render_field(event_data: &Map<String, Value>, key: &str) -> String {
    match event_data.get(key) {
        None | Some(Value::Null) => ABSENT_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Build the event-insight prompt from an event's fields.
pub fn build_insight_prompt(event_data: &Map<String, Value>) -> String {
    format!(
        "Analyze the following event details and provide 3 key insights or suggestions for improvement:\n\
         \n\
         Title: {title}\n\
         Description: {description}\n\
         Category: {category}\n\
         \n\
         Focus on:\n\
         1. Audience Engagement\n\
         2. Clarity of Purpose\n\
         3. Potential Reach\n",
        title = render_field(event_data, "title"),
        description = render_field(event_data, "description"),
        category = render_field(event_data, "category"),
    )
}

/// Leading content part for caller-supplied context. Blank context is dropped.
pub fn context_part(context: &str) -> Option<String> {
    let context = context.trim();
    if context.is_empty() {
        None
    } else {
        Some(format!("Context: {}", context))
    }
}
