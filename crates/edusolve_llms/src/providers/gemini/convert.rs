//! Conversion between unified types and Gemini wire types

use super::types::{
    GeminiContent, GeminiGenerationConfig, GeminiInlineData, GeminiPart, GeminiRequest,
    GeminiResponse,
};
use crate::error::Result;
use crate::types::{
    ContentPart, FinishReason, FinishReasonKind, GenerateRequest, GenerateResponse, Message,
    ResponseContent, Role, Usage,
};
use serde_json::json;

/// Convert unified request to Gemini request
pub fn to_gemini_request(req: &GenerateRequest) -> Result<GeminiRequest> {
    let contents = req.messages.iter().map(to_gemini_content).collect();

    let system_instruction = req.system_instruction.as_ref().map(|text| GeminiContent {
        role: None,
        parts: vec![GeminiPart {
            text: Some(text.clone()),
            ..Default::default()
        }],
    });

    let opts = &req.options;
    let generation_config =
        if opts.temperature.is_some() || opts.top_p.is_some() || opts.max_output_tokens.is_some() {
            Some(GeminiGenerationConfig {
                temperature: opts.temperature,
                top_p: opts.top_p,
                max_output_tokens: opts.max_output_tokens,
            })
        } else {
            None
        };

    Ok(GeminiRequest {
        contents,
        system_instruction,
        generation_config,
    })
}

fn to_gemini_content(msg: &Message) -> GeminiContent {
    let role = match msg.role {
        Role::User => "user",
        Role::Model => "model",
    };

    let parts = msg
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            ContentPart::InlineData { media_type, data } => GeminiPart {
                inline_data: Some(GeminiInlineData {
                    mime_type: media_type.clone(),
                    data: data.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();

    GeminiContent {
        role: Some(role.to_string()),
        parts,
    }
}

/// Convert Gemini response to unified response.
///
/// A response without candidates yields empty content; callers decide what
/// an empty answer means.
pub fn from_gemini_response(resp: GeminiResponse) -> Result<GenerateResponse> {
    let candidate = resp.candidates.first();
    let mut content = Vec::new();

    if let Some(parts) = candidate.and_then(|c| c.content.as_ref()).map(|c| &c.parts) {
        for part in parts {
            let Some(text) = part.text.as_ref().filter(|t| !t.is_empty()) else {
                continue;
            };
            if part.thought.unwrap_or(false) {
                content.push(ResponseContent::Reasoning {
                    reasoning: text.clone(),
                });
            } else {
                content.push(ResponseContent::Text { text: text.clone() });
            }
        }
    }

    let finish_reason = match candidate.and_then(|c| c.finish_reason.as_deref()) {
        Some(raw) => parse_finish_reason(raw),
        None => match resp
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            Some(reason) => FinishReason::with_raw(FinishReasonKind::ContentFilter, reason.clone()),
            None => FinishReason::other(),
        },
    };

    let usage = resp
        .usage_metadata
        .as_ref()
        .map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    let metadata = if resp.model_version.is_some() || resp.response_id.is_some() {
        Some(json!({
            "model_version": resp.model_version,
            "response_id": resp.response_id,
        }))
    } else {
        None
    };

    Ok(GenerateResponse {
        content,
        usage,
        finish_reason,
        metadata,
    })
}

fn parse_finish_reason(raw: &str) -> FinishReason {
    let unified = match raw {
        "STOP" => FinishReasonKind::Stop,
        "MAX_TOKENS" => FinishReasonKind::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReasonKind::ContentFilter
        }
        _ => FinishReasonKind::Other,
    };
    FinishReason::with_raw(unified, raw)
}
