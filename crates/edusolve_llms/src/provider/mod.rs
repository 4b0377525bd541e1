//! Provider trait and registry

mod trait_def;

pub use trait_def::Provider;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{GeminiProvider, ZaiProvider};

/// Providers available to a session, keyed by provider ID.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every provider whose API key is present in the environment.
    /// Providers without a key are skipped, not reported.
    pub fn from_env() -> Self {
        let mut registry = Self::new();
        if let Ok(gemini) = GeminiProvider::from_env() {
            registry = registry.register("gemini", gemini);
        }
        if let Ok(zai) = ZaiProvider::from_env() {
            registry = registry.register("zai", zai);
        }
        registry
    }

    /// Register a provider under the given ID. Returns `self` for chaining.
    pub fn register<P: Provider + 'static>(self, id: impl Into<String>, provider: P) -> Self {
        self.register_arc(id, Arc::new(provider))
    }

    /// Register an already shared provider.
    pub fn register_arc(mut self, id: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.providers.insert(id.into(), provider);
        self
    }

    pub fn get_provider(&self, id: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ProviderNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered provider IDs, sorted.
    pub fn list_providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}
