//! Generative LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation
///
/// Implementations:
/// - `GeminiClient`: hosted Gemini generateContent API
/// - test mocks
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate a completion for a prompt
    ///
    /// Returns `Error::RateLimited` when the backend answers with HTTP 429
    /// so callers can substitute a quota wait-time message.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
