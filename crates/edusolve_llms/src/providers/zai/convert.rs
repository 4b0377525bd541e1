//! Conversion between unified types and Z.AI types

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::types::{ZaiMessage, ZaiRequest, ZaiResponse};
use crate::error::{Error, Result};
use crate::types::{
    ContentPart, FinishReason, FinishReasonKind, GenerateRequest, GenerateResponse, Message,
    ResponseContent, Role, Usage,
};
use serde_json::json;

/// Convert unified request to Z.AI request
pub fn to_zai_request(req: &GenerateRequest) -> Result<ZaiRequest> {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);

    if let Some(ref system) = req.system_instruction {
        messages.push(ZaiMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }

    for msg in &req.messages {
        messages.push(to_zai_message(msg)?);
    }

    Ok(ZaiRequest {
        model: req.model.clone(),
        messages,
        temperature: req.options.temperature,
        top_p: req.options.top_p,
        max_tokens: req.options.max_output_tokens,
    })
}

/// Convert unified message to Z.AI message
fn to_zai_message(msg: &Message) -> Result<ZaiMessage> {
    let role = match msg.role {
        Role::User => "user",
        Role::Model => "assistant",
    };

    let mut sections = Vec::with_capacity(msg.parts.len());
    for part in &msg.parts {
        match part {
            ContentPart::Text { text } => sections.push(text.clone()),
            ContentPart::InlineData { media_type, data } => {
                sections.push(inline_as_text(media_type, data)?)
            }
        }
    }

    Ok(ZaiMessage {
        role: role.to_string(),
        content: sections.join("\n\n"),
    })
}

/// Inline the decoded payload of a textual document.
fn inline_as_text(media_type: &str, data: &str) -> Result<String> {
    let textual = media_type.starts_with("text/") || media_type == "application/json";
    if !textual {
        return Err(Error::UnsupportedMediaType(media_type.to_string()));
    }
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| Error::Other(format!("invalid base64 payload: {}", e)))?;
    String::from_utf8(bytes).map_err(|_| Error::UnsupportedMediaType(media_type.to_string()))
}

/// Convert Z.AI response to unified response
pub fn from_zai_response(resp: ZaiResponse) -> Result<GenerateResponse> {
    let choice = resp
        .choices
        .first()
        .ok_or_else(|| Error::invalid_response("No choices in Z.AI response"))?;

    let mut content = Vec::new();

    if let Some(ref reasoning) = choice.message.reasoning_content {
        if !reasoning.is_empty() {
            content.push(ResponseContent::Reasoning {
                reasoning: reasoning.clone(),
            });
        }
    }

    if let Some(ref text) = choice.message.content {
        if !text.is_empty() {
            content.push(ResponseContent::Text { text: text.clone() });
        }
    }

    let usage = resp
        .usage
        .as_ref()
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(GenerateResponse {
        content,
        usage,
        finish_reason: parse_finish_reason(&choice.finish_reason),
        metadata: Some(json!({
            "id": resp.id,
            "model": resp.model,
        })),
    })
}

/// Parse Z.AI finish reason to unified finish reason
pub fn parse_finish_reason(reason: &Option<String>) -> FinishReason {
    match reason.as_deref() {
        Some("stop") => FinishReason::with_raw(FinishReasonKind::Stop, "stop"),
        Some("length") => FinishReason::with_raw(FinishReasonKind::Length, "length"),
        Some(raw @ ("sensitive" | "content_filter")) => {
            FinishReason::with_raw(FinishReasonKind::ContentFilter, raw)
        }
        Some(raw) => FinishReason::with_raw(FinishReasonKind::Other, raw),
        None => FinishReason::other(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finish_reason() {
        assert_eq!(
            parse_finish_reason(&Some("stop".to_string())).unified,
            FinishReasonKind::Stop
        );
        assert_eq!(
            parse_finish_reason(&Some("length".to_string())).unified,
            FinishReasonKind::Length
        );
        assert_eq!(
            parse_finish_reason(&Some("sensitive".to_string())).unified,
            FinishReasonKind::ContentFilter
        );
        assert_eq!(parse_finish_reason(&None).unified, FinishReasonKind::Other);
    }

    #[test]
    fn test_system_instruction_becomes_first_message() {
        let req = GenerateRequest::new("glm-4-plus", vec![Message::user_text("salut")])
            .with_system_instruction("règles");
        let zai = to_zai_request(&req).unwrap();
        assert_eq!(zai.messages[0].role, "system");
        assert_eq!(zai.messages[0].content, "règles");
        assert_eq!(zai.messages[1].role, "user");
    }

    #[test]
    fn test_text_document_is_inlined() {
        // "# Cours" in base64
        let msg = Message::user(vec![
            ContentPart::inline_data("text/plain", "IyBDb3Vycw=="),
            ContentPart::text("consigne"),
        ]);
        let zai = to_zai_message(&msg).unwrap();
        assert_eq!(zai.content, "# Cours\n\nconsigne");
    }

    #[test]
    fn test_pdf_is_refused() {
        let msg = Message::user(vec![ContentPart::inline_data("application/pdf", "JVBERg==")]);
        let err = to_zai_message(&msg).unwrap_err();
        assert!(err.is_unsupported_media_type());
    }

    #[test]
    fn test_model_role_is_assistant() {
        let zai = to_zai_message(&Message::model_text("ok")).unwrap();
        assert_eq!(zai.role, "assistant");
    }

    #[test]
    fn test_no_choices_is_invalid() {
        let resp: ZaiResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            from_zai_response(resp),
            Err(Error::InvalidResponse(_))
        ));
    }
}
