//! Model and provider defaults

/// Default generation model (instruction-following quality matters more than latency)
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
/// Default model when the Z.AI provider is selected
pub const DEFAULT_ZAI_MODEL: &str = "glm-4.6";
/// Sampling temperature used for corrections; kept low for determinism
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Delay between forcing explanations open and capturing the export
pub const DEFAULT_EXPORT_SETTLE_MS: u64 = 300;

pub mod env {
    pub const PROVIDER: &str = "EDUSOLVE_PROVIDER";
    pub const MODEL: &str = "EDUSOLVE_MODEL";
    pub const CHAT_MODEL: &str = "EDUSOLVE_CHAT_MODEL";
    pub const TEMPERATURE: &str = "EDUSOLVE_TEMPERATURE";
    pub const EXPORT_SETTLE_MS: &str = "EDUSOLVE_EXPORT_SETTLE_MS";
    pub const BASE_URL: &str = "EDUSOLVE_BASE_URL";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Legacy name read when GEMINI_API_KEY is absent
    pub const API_KEY: &str = "API_KEY";
    pub const ZAI_API_KEY: &str = "ZAI_API_KEY";
}
