//! Z.AI provider

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::convert::{from_zai_response, to_zai_request};
use super::types::{ZaiConfig, ZaiErrorResponse, ZaiResponse, STATIC_MODELS};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse, Headers};

pub struct ZaiProvider {
    config: ZaiConfig,
    client: Client,
}

impl ZaiProvider {
    pub const API_KEY_ENV: &'static str = "ZAI_API_KEY";

    pub fn new(config: ZaiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("zai".to_string()));
        }
        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    pub fn from_env() -> Result<Self> {
        std::env::var(Self::API_KEY_ENV)
            .map_err(|_| Error::MissingApiKey("zai".to_string()))
            .and_then(|key| Self::new(ZaiConfig::new(key)))
    }

    pub fn config(&self) -> &ZaiConfig {
        &self.config
    }
}

/// Keep the API's own message when the body is the documented error shape.
fn classify_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ZaiErrorResponse>(body) {
        Ok(ZaiErrorResponse { error }) => Error::provider_error(format!(
            "Z.AI API error {} ({}): {}",
            status,
            error.code.as_deref().unwrap_or("-"),
            error.message
        )),
        Err(_) => Error::provider_error(format!("Z.AI API error {}: {}", status, body)),
    }
}

#[async_trait]
impl Provider for ZaiProvider {
    fn provider_id(&self) -> &str {
        "zai"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Authorization", format!("Bearer {}", self.config.api_key));
        headers.insert("Content-Type", "application/json");
        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }
        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(STATIC_MODELS.iter().map(|m| m.to_string()).collect())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        // Refuse binary documents before any network traffic
        let body = to_zai_request(&request)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(model = %request.model, messages = body.messages.len(), "zai generate");

        let response = self
            .client
            .post(self.config.completions_url())
            .headers(headers.to_reqwest_headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }

        let parsed: ZaiResponse = response.json().await?;
        from_zai_response(parsed)
    }
}
