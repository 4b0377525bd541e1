//! Google Gemini provider module
//!
//! Implements the Provider trait over the `generateContent` REST endpoint.
//! Inline document parts (PDF, text) are sent as `inlineData`.
//! API docs: https://ai.google.dev/api/generate-content

mod convert;
mod provider;
mod types;

pub use provider::GeminiProvider;
pub use types::{GeminiConfig, GeminiRequest, GeminiResponse};
