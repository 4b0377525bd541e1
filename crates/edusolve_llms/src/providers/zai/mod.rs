//! Z.AI provider module
//!
//! Implements the Provider trait for Z.AI's GLM chat completions endpoint.
//! The endpoint only takes text, so textual inline documents are decoded
//! into the message body and binary ones are refused.
//! API docs: https://docs.z.ai/api-reference/llm/chat-completion

mod convert;
mod provider;
mod types;

pub use provider::ZaiProvider;
pub use types::{ZaiConfig, ZaiRequest, ZaiResponse};
