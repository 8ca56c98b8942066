use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::models::{GenerateEventInsightRequest, GenerateTextRequest, GenerationResponse};
use crate::services::DEFAULT_TEMPERATURE;
use crate::startup::AppState;

/// Reject relay requests up front when no credential was supplied.
fn ensure_configured(state: &AppState) -> Result<(), AppError> {
    if state.gemini.has_credential() {
        Ok(())
    } else {
        Err(AppError::ServiceUnavailable(
            "Gemini API is not configured".to_string(),
        ))
    }
}

/// Generate text from a free-form prompt.
#[tracing::instrument(skip(state, request), fields(prompt_len = request.prompt.len()))]
pub async fn generate_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerateTextRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    ensure_configured(&state)?;

    let result = state
        .gemini
        .generate_text(
            &request.prompt,
            request.context.as_deref(),
            DEFAULT_TEMPERATURE,
        )
        .await;

    Ok(Json(GenerationResponse { result }))
}

/// Generate improvement insights for an event.
#[tracing::instrument(skip(state, request), fields(insight_type = %request.insight_type))]
pub async fn generate_event_insight(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerateEventInsightRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    ensure_configured(&state)?;

    let result = state
        .gemini
        .generate_event_insights(&request.event_data, &request.insight_type)
        .await;

    Ok(Json(GenerationResponse { result }))
}
