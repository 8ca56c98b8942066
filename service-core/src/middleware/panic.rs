use crate::error::AppError;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Render a handler panic as a 500 `AppError` carrying the panic message.
///
/// Intended for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(error = %message, "Request handler panicked");

    AppError::InternalError(anyhow::anyhow!(message)).into_response()
}
