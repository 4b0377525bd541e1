use std::sync::Arc;

use crate::error::Error;
use crate::provider::{Provider, ProviderRegistry};
use crate::types::{GenerateRequest, GenerateResponse, Headers};
use async_trait::async_trait;

/// Mock provider for testing
struct MockProvider {
    id: &'static str,
}

#[async_trait]
impl Provider for MockProvider {
    fn provider_id(&self) -> &str {
        self.id
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, _request: GenerateRequest) -> crate::error::Result<GenerateResponse> {
        Err(Error::Other("mock".to_string()))
    }
}

#[test]
fn test_register_and_get_provider() {
    let registry = ProviderRegistry::new().register("gemini", MockProvider { id: "gemini" });

    let provider = registry.get_provider("gemini").unwrap();
    assert_eq!(provider.provider_id(), "gemini");
    assert!(registry.contains("gemini"));
}

#[test]
fn test_provider_not_found() {
    let registry = ProviderRegistry::new();
    assert!(registry.is_empty());
    assert!(matches!(
        registry.get_provider("nonexistent"),
        Err(Error::ProviderNotFound(id)) if id == "nonexistent"
    ));
}

#[test]
fn test_list_providers_sorted() {
    let shared: Arc<dyn Provider> = Arc::new(MockProvider { id: "alpha" });
    let registry = ProviderRegistry::new()
        .register("zai", MockProvider { id: "zai" })
        .register_arc("alpha", shared);

    assert_eq!(registry.list_providers(), vec!["alpha", "zai"]);
}

#[tokio::test]
async fn test_default_list_models_is_empty() {
    let provider = MockProvider { id: "x" };
    assert!(provider.list_models().await.unwrap().is_empty());
}
