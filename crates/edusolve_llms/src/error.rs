//! Error types for provider calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    /// The remote side refused an inline part because of its media type.
    #[error("Unsupported MIME type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("A chat turn is already in flight")]
    TurnInFlight,

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn provider_error(message: impl Into<String>) -> Self {
        Error::Provider(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Error::InvalidResponse(message.into())
    }

    pub fn is_unsupported_media_type(&self) -> bool {
        matches!(self, Error::UnsupportedMediaType(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
