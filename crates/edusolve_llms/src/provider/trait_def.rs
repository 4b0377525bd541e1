use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateResponse, Headers};

/// A hosted model endpoint.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, e.g. `"gemini"`.
    fn provider_id(&self) -> &str;

    /// Default request headers merged with per-request overrides.
    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers;

    /// Models the provider can serve. Providers without a listing endpoint
    /// return a static list.
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Single-shot generation: one request, one complete response.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
