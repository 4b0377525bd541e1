//! edusolve_llms: provider-agnostic completions for document-grounded prompts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  ProviderRegistry                    │
//! │  ┌──────────────────────────────────────────────┐   │
//! │  │  BTreeMap<String, Arc<dyn Provider>>          │   │
//! │  └──────────────────────────────────────────────┘   │
//! │                       │                              │
//! │          ┌────────────┴────────────┐                │
//! │          ▼                         ▼                │
//! │   ┌────────────┐            ┌──────────┐            │
//! │   │  Gemini    │            │  Z.AI    │            │
//! │   │  Provider  │            │ Provider │            │
//! │   └────────────┘            └──────────┘            │
//! └──────────────────────────────────────────────────────┘
//!                         │
//!                         ▼
//!                  ChatSession (multi-turn, one turn in flight)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edusolve_llms::{GeminiProvider, ProviderRegistry};
//!
//! let provider = GeminiProvider::from_env().unwrap();
//! let registry = ProviderRegistry::new()
//!     .register("gemini", provider);
//! ```

pub mod chat;
pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export core abstractions
pub use chat::ChatSession;
pub use error::{Error, Result};
pub use provider::{Provider, ProviderRegistry};

// Re-export provider implementations
pub use providers::GeminiProvider;
pub use providers::ZaiProvider;

// Re-export commonly used types
pub use types::{
    ContentPart, GenerateOptions, GenerateRequest, GenerateResponse, Message, Role, Usage,
};
