//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

enum MockReply {
    Text(String),
    Echo,
    Fail(String),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    reply: MockReply,
    configured: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            configured: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Answers with `Mock response for: <prompt>`.
    pub fn echo() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    /// Always fails with an `ApiError` carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Fail(message.into()))
    }

    /// Report the credential as missing in `is_configured`.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Echo => Ok(format!("Mock response for: {}", prompt)),
            MockReply::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
