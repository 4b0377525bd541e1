//! Runtime configuration for EduSolve

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use edusolve_constant::model::{
    env, DEFAULT_EXPORT_SETTLE_MS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_ZAI_MODEL,
};
use edusolve_llms::providers::gemini::GeminiConfig;
use edusolve_llms::providers::zai::ZaiConfig;
use edusolve_llms::{GeminiProvider, Provider, ZaiProvider};

use crate::error::RuntimeError;

/// LLM provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Gemini,
    Zai,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Zai => "zai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => DEFAULT_MODEL,
            LlmProvider::Zai => DEFAULT_ZAI_MODEL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "zai" | "z.ai" => Ok(LlmProvider::Zai),
            _ => Err(RuntimeError::Config(format!(
                "fournisseur inconnu « {} » (disponibles : gemini, zai)",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub provider: LlmProvider,
    /// Model used for the correction
    pub model: String,
    /// Model used for follow-up chat (None = same as `model`)
    pub chat_model: Option<String>,
    pub temperature: f32,
    /// Pause between forcing explanations open and writing the export
    pub export_settle: Duration,
    /// Endpoint override for the selected provider
    pub base_url: Option<String>,
    gemini_api_key: Option<String>,
    zai_api_key: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: DEFAULT_MODEL.to_string(),
            chat_model: None,
            temperature: DEFAULT_TEMPERATURE,
            export_settle: Duration::from_millis(DEFAULT_EXPORT_SETTLE_MS),
            base_url: None,
            gemini_api_key: None,
            zai_api_key: None,
        }
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        if self.model == self.provider.default_model() {
            self.model = provider.default_model().to_string();
        }
        self.provider = provider;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_export_settle(mut self, settle: Duration) -> Self {
        self.export_settle = settle;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        match self.provider {
            LlmProvider::Gemini => self.gemini_api_key = Some(key.into()),
            LlmProvider::Zai => self.zai_api_key = Some(key.into()),
        }
        self
    }

    pub fn chat_model(&self) -> &str {
        self.chat_model.as_deref().unwrap_or(&self.model)
    }

    /// Key for the selected provider, if one was configured.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            LlmProvider::Gemini => self.gemini_api_key.as_deref(),
            LlmProvider::Zai => self.zai_api_key.as_deref(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        config.gemini_api_key = get(env::GEMINI_API_KEY).or_else(|| get(env::API_KEY));
        config.zai_api_key = get(env::ZAI_API_KEY);

        let provider = match get(env::PROVIDER).and_then(|p| p.parse::<LlmProvider>().ok()) {
            Some(provider) => provider,
            // Infer from keys so ZAI_API_KEY alone selects Z.AI
            None if config.gemini_api_key.is_none() && config.zai_api_key.is_some() => {
                LlmProvider::Zai
            }
            None => LlmProvider::Gemini,
        };
        config = config.with_provider(provider);

        if let Some(model) = get(env::MODEL) {
            config.model = model;
        }
        config.chat_model = get(env::CHAT_MODEL);

        if let Some(val) = get(env::TEMPERATURE).and_then(|t| t.parse::<f32>().ok()) {
            config.temperature = val;
        }

        if let Some(ms) = get(env::EXPORT_SETTLE_MS).and_then(|t| t.parse::<u64>().ok()) {
            config.export_settle = Duration::from_millis(ms);
        }

        config.base_url = get(env::BASE_URL);

        config
    }

    /// Build the selected provider.
    pub fn build_provider(&self) -> edusolve_llms::Result<Arc<dyn Provider>> {
        let key = self.api_key().unwrap_or_default().to_string();
        let provider: Arc<dyn Provider> = match self.provider {
            LlmProvider::Gemini => {
                let mut config = GeminiConfig::new(key);
                if let Some(url) = &self.base_url {
                    config = config.with_base_url(url.clone());
                }
                Arc::new(GeminiProvider::new(config)?)
            }
            LlmProvider::Zai => {
                let mut config = ZaiConfig::new(key);
                if let Some(url) = &self.base_url {
                    config = config.with_base_url(url.clone());
                }
                Arc::new(ZaiProvider::new(config)?)
            }
        };
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!("ZAI".parse::<LlmProvider>().unwrap(), LlmProvider::Zai);
        assert_eq!("z.ai".parse::<LlmProvider>().unwrap(), LlmProvider::Zai);

        let err = "openai".parse::<LlmProvider>().unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration invalide : fournisseur inconnu « openai » (disponibles : gemini, zai)"
        );
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(config.chat_model(), "gemini-3-pro-preview");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.export_settle, Duration::from_millis(300));
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_provider_inferred_from_zai_key() {
        let config = RuntimeConfig::from_lookup(lookup(&[("ZAI_API_KEY", "z")]));
        assert_eq!(config.provider, LlmProvider::Zai);
        assert_eq!(config.model, "glm-4.6");
        assert_eq!(config.api_key(), Some("z"));
    }

    #[test]
    fn test_legacy_api_key_fallback() {
        let config = RuntimeConfig::from_lookup(lookup(&[("API_KEY", "legacy")]));
        assert_eq!(config.api_key(), Some("legacy"));

        let config = RuntimeConfig::from_lookup(lookup(&[
            ("API_KEY", "legacy"),
            ("GEMINI_API_KEY", "primary"),
        ]));
        assert_eq!(config.api_key(), Some("primary"));
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("EDUSOLVE_PROVIDER", "gemini"),
            ("ZAI_API_KEY", "z"),
            ("EDUSOLVE_MODEL", "gemini-2.5-flash"),
            ("EDUSOLVE_CHAT_MODEL", "gemini-2.5-flash-lite"),
            ("EDUSOLVE_TEMPERATURE", "0.4"),
            ("EDUSOLVE_EXPORT_SETTLE_MS", "0"),
            ("EDUSOLVE_BASE_URL", "http://localhost:9999"),
        ]));
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.chat_model(), "gemini-2.5-flash-lite");
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.export_settle, Duration::ZERO);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[("EDUSOLVE_TEMPERATURE", "chaud")]));
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_build_provider_without_key_fails() {
        let config = RuntimeConfig::new();
        assert!(matches!(
            config.build_provider(),
            Err(edusolve_llms::Error::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_build_provider() {
        let config = RuntimeConfig::new()
            .with_provider(LlmProvider::Zai)
            .with_api_key("k");
        let provider = config.build_provider().unwrap();
        assert_eq!(provider.provider_id(), "zai");
    }
}
