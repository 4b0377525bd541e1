//! Wire types for the Z.AI chat completions endpoint

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.z.ai/api/paas/v4/";

/// The endpoint has no listing route; these are the text models it serves.
pub const STATIC_MODELS: &[&str] = &["glm-4.6", "glm-4.5", "glm-4.5-air", "glm-4-plus", "glm-4-flash"];

#[derive(Debug, Clone)]
pub struct ZaiConfig {
    pub api_key: String,
    /// Always ends with `/`
    pub base_url: String,
}

impl ZaiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = if url.ends_with('/') { url } else { format!("{url}/") };
        self
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
pub struct ZaiRequest {
    pub model: String,
    pub messages: Vec<ZaiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Plain-text chat message; documents are inlined into `content`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ZaiMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ZaiResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ZaiChoice>,
    #[serde(default)]
    pub usage: Option<ZaiUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ZaiChoice {
    pub message: ZaiAssistantMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZaiAssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    /// Thinking trace of GLM reasoning models
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZaiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// `{"error": {"code": "1211", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ZaiErrorResponse {
    pub error: ZaiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ZaiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}
