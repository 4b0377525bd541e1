//! Unified request/response types shared by every provider

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Conversation role. The hosted model's side is `Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One fragment of a message: either an inline payload tagged with a media
/// type (base64 data), or a plain text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    InlineData { media_type: String, data: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn inline_data(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::InlineData {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn media_type(&self) -> Option<&str> {
        match self {
            ContentPart::InlineData { media_type, .. } => Some(media_type),
            ContentPart::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self::new(Role::User, parts)
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentPart::text(text)])
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![ContentPart::text(text)])
    }

    /// Concatenated text parts, `None` when the message carries no text.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}

/// Extra HTTP headers, merged over the provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn merge_with(&mut self, other: &Headers) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Invalid names or values are skipped.
    pub fn to_reqwest_headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in &self.0 {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(k.as_bytes()),
                HeaderValue::from_str(v),
            ) {
                map.insert(name, value);
            }
        }
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            messages,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseContent {
    Text { text: String },
    Reasoning { reasoning: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReasonKind {
    Stop,
    Length,
    ContentFilter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishReason {
    pub unified: FinishReasonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl FinishReason {
    pub fn with_raw(unified: FinishReasonKind, raw: impl Into<String>) -> Self {
        Self {
            unified,
            raw: Some(raw.into()),
        }
    }

    pub fn other() -> Self {
        Self {
            unified: FinishReasonKind::Other,
            raw: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: Vec<ResponseContent>,
    pub usage: Usage,
    pub finish_reason: FinishReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl GenerateResponse {
    /// Generated text with reasoning parts left out.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ResponseContent::Text { text } => Some(text.as_str()),
                ResponseContent::Reasoning { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_joins_text_parts() {
        let msg = Message::user(vec![
            ContentPart::inline_data("application/pdf", "JVBERg=="),
            ContentPart::text("a"),
            ContentPart::text("b"),
        ]);
        assert_eq!(msg.text(), Some("a\nb".to_string()));

        let only_data = Message::user(vec![ContentPart::inline_data("text/plain", "eA==")]);
        assert_eq!(only_data.text(), None);
    }

    #[test]
    fn test_headers_merge() {
        let mut base = Headers::new();
        base.insert("Content-Type", "application/json");
        let mut custom = Headers::new();
        custom.insert("Content-Type", "text/plain");
        custom.insert("X-Trace", "1");
        base.merge_with(&custom);

        assert_eq!(base.get("Content-Type"), Some("text/plain"));
        assert_eq!(base.to_reqwest_headers().len(), 2);
    }

    #[test]
    fn test_response_text_skips_reasoning() {
        let resp = GenerateResponse {
            content: vec![
                ResponseContent::Reasoning {
                    reasoning: "hmm".to_string(),
                },
                ResponseContent::Text {
                    text: "# 1. Solution".to_string(),
                },
            ],
            usage: Usage::default(),
            finish_reason: FinishReason::other(),
            metadata: None,
        };
        assert_eq!(resp.text(), "# 1. Solution");
    }

    #[test]
    fn test_content_part_serialization() {
        let part = ContentPart::inline_data("application/pdf", "AAA=");
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains(r#""type":"inline_data""#));
        assert_eq!(part.media_type(), Some("application/pdf"));
    }
}
