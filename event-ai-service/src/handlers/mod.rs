//! HTTP handlers for the event AI service.

pub mod ai;
pub mod health;
