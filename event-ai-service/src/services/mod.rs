pub mod gemini_service;
pub mod metrics;
pub mod providers;

pub use gemini_service::{GeminiService, DEFAULT_TEMPERATURE};
pub use metrics::{get_metrics, init_metrics};
