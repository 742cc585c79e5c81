//! Text generation providers.
//!
//! The relay talks to a single `TextProvider`; Gemini in production and the
//! mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::ContentFiltered(_) => "content_filtered",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// A text completion backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` as a single user turn and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name reported in logs.
    fn name(&self) -> &str;

    /// Whether a credential is present. Never performs I/O.
    fn is_configured(&self) -> bool;
}
