//! Model gateway: one-shot correction and chat sessions over a provider.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use edusolve_core::Solution;
use edusolve_llms::types::Headers;
use edusolve_llms::{
    ChatSession, Error as LlmError, GenerateOptions, GenerateRequest, GenerateResponse, Provider,
};
use edusolve_observability::{record_duration, record_error};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::prompt::{chat_instruction, ComposedRequest};

/// Text used when the model answers with nothing.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Désolé, je n'ai pas pu générer de réponse.";

pub struct ModelGateway {
    provider: Arc<dyn Provider>,
    model: String,
    chat_model: String,
    temperature: f32,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn Provider>, config: &RuntimeConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            chat_model: config.chat_model().to_string(),
            temperature: config.temperature,
        }
    }

    /// Build from configuration. A provider that cannot be built (missing
    /// key) is kept as a stand-in whose calls fail, so the problem surfaces
    /// when a correction is requested.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let provider = match config.build_provider() {
            Ok(provider) => provider,
            Err(e) => {
                warn!(provider = %config.provider, error = %e, "provider unavailable");
                Arc::new(Unconfigured {
                    id: config.provider.as_str(),
                }) as Arc<dyn Provider>
            }
        };
        Self::new(provider, config)
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a composed request and return the correction text.
    pub async fn generate(&self, composed: ComposedRequest) -> Result<String> {
        let span = tracing::Span::current();
        span.record("model", self.model.as_str());

        let request = composed.into_request(self.model.clone(), self.temperature);
        debug!(
            parts = request.messages.first().map(|m| m.parts.len()).unwrap_or(0),
            "generate request"
        );

        let start = Instant::now();
        let result = self.provider.generate(request).await;
        record_duration("duration_ms", start.elapsed());

        match result {
            Ok(response) => {
                let text = response.text();
                info!(
                    completion_tokens = response.usage.completion_tokens,
                    finish = ?response.finish_reason.unified,
                    "correction received"
                );
                if text.trim().is_empty() {
                    Ok(EMPTY_RESPONSE_FALLBACK.to_string())
                } else {
                    Ok(text)
                }
            }
            Err(e) => {
                record_error(&e);
                Err(RuntimeError::from_llm(e))
            }
        }
    }

    /// Open a chat whose system instruction embeds the correction verbatim.
    pub fn open_chat(&self, solution: &Solution) -> ChatSession {
        ChatSession::new(
            self.provider.clone(),
            self.chat_model.clone(),
            chat_instruction(&solution.text),
        )
        .with_options(GenerateOptions {
            temperature: Some(self.temperature),
            ..Default::default()
        })
    }

    /// Round-trip a tiny prompt to check the provider answers.
    pub async fn ping(&self) -> Result<String> {
        let request = GenerateRequest::new(
            self.model.clone(),
            vec![edusolve_llms::Message::user_text("Réponds simplement : OK")],
        );
        let response = self
            .provider
            .generate(request)
            .await
            .map_err(RuntimeError::from_llm)?;
        Ok(response.text())
    }
}

/// Stand-in for a provider whose construction failed.
struct Unconfigured {
    id: &'static str,
}

#[async_trait]
impl Provider for Unconfigured {
    fn provider_id(&self) -> &str {
        self.id
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, _request: GenerateRequest) -> edusolve_llms::Result<GenerateResponse> {
        Err(LlmError::MissingApiKey(self.id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::compose;
    use edusolve_core::UploadedFile;

    #[tokio::test]
    async fn test_missing_key_surfaces_on_generate() {
        let gateway = ModelGateway::from_config(&RuntimeConfig::new());
        assert_eq!(gateway.provider_id(), "gemini");

        let file = UploadedFile::from_bytes("td.pdf", "application/pdf", b"%PDF");
        let err = gateway
            .generate(compose(&[file.clone()], &file))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::GenerationFailed(LlmError::MissingApiKey(_))
        ));
    }
}
