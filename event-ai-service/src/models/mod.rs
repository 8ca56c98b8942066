//! Request/response shapes and prompt construction for the event AI service.

pub mod prompt;
pub mod requests;

pub use requests::{GenerateEventInsightRequest, GenerateTextRequest, GenerationResponse};
