//! Gemini provider implementation

use super::convert::{from_gemini_response, to_gemini_request};
use super::types::{GeminiConfig, GeminiErrorResponse, GeminiModelsResponse, GeminiResponse};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse, Headers};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Substring the API uses when an inline part has a media type it refuses.
const UNSUPPORTED_MIME_MARKER: &str = "Unsupported MIME type";

/// Google Gemini provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "GEMINI_API_KEY";
    /// Generic fallback variable, read when `GEMINI_API_KEY` is unset
    pub const FALLBACK_API_KEY_ENV: &'static str = "API_KEY";

    /// Create a new Gemini provider
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey("gemini".to_string()));
        }

        let client = Client::new();
        Ok(Self { config, client })
    }

    /// Create provider from environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .or_else(|_| std::env::var(Self::FALLBACK_API_KEY_ENV))
            .map_err(|_| Error::MissingApiKey("gemini".to_string()))?;

        Self::new(GeminiConfig::new(api_key))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

/// Map a non-2xx body to an error, singling out refused media types.
fn classify_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    if message.contains(UNSUPPORTED_MIME_MARKER) {
        Error::UnsupportedMediaType(message)
    } else {
        Error::provider_error(format!("Gemini API error {}: {}", status, message))
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();
        headers.insert("x-goog-api-key", self.config.api_key.clone());
        headers.insert("Content-Type", "application/json");

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.build_headers(None).to_reqwest_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        let listing: GeminiModelsResponse = response.json().await?;
        Ok(listing
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|g| g == "generateContent")
            })
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(m.name)
            })
            .collect())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!(
            "{}models/{}:generateContent",
            self.config.base_url, request.model
        );
        let gemini_request = to_gemini_request(&request)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status, "Gemini request failed");

            return Err(classify_error(status, &body));
        }

        let gemini_resp: GeminiResponse = response.json().await?;
        from_gemini_response(gemini_resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_rejected() {
        let err = GeminiProvider::new(GeminiConfig::new("")).err().unwrap();
        assert!(matches!(err, Error::MissingApiKey(_)));
    }

    #[test]
    fn test_unsupported_mime_is_classified() {
        let body = r#"{"error":{"code":400,"message":"Unsupported MIME type: application/msword","status":"INVALID_ARGUMENT"}}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, body);
        assert!(err.is_unsupported_media_type());
    }

    #[test]
    fn test_other_error_is_provider_error() {
        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, Error::Provider(ref m) if m.contains("boom")));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = GeminiConfig::new("k").with_base_url("http://localhost:1234");
        assert_eq!(config.base_url, "http://localhost:1234/");
    }
}
