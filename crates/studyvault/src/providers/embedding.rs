//! Embedding provider trait and the validating gateway in front of it

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;

/// Maximum input length accepted by the hosted embedding models
pub const MAX_EMBED_INPUT_CHARS: usize = 9000;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `GeminiClient`: hosted Gemini embedding API
/// - test mocks
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Validating wrapper around an [`EmbeddingProvider`].
///
/// Sanitizes input before the provider sees it and converts every failure
/// mode into `None` so callers can skip the affected chunk instead of
/// aborting a whole ingestion.
pub struct EmbeddingGateway {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Strip NUL bytes, trim whitespace, and cap length at the model limit
    pub fn sanitize(text: &str) -> String {
        let cleaned = text.replace('\0', "");
        let trimmed = cleaned.trim();
        trimmed.chars().take(MAX_EMBED_INPUT_CHARS).collect()
    }

    /// A usable embedding is non-empty and has at least one non-zero value
    fn is_usable(vector: &[f32]) -> bool {
        !vector.is_empty() && vector.iter().any(|v| *v != 0.0)
    }

    /// Embed a text, returning `None` for empty input, provider failure,
    /// or a degenerate (empty / all-zero) vector.
    pub async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        let cleaned = Self::sanitize(text);
        if cleaned.is_empty() {
            tracing::warn!("Skipping embedding for empty input");
            return None;
        }

        match self.provider.embed(&cleaned).await {
            Ok(vector) if Self::is_usable(&vector) => Some(vector),
            Ok(_) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "Provider returned an unusable embedding vector"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "Embedding failed: {}",
                    e
                );
                None
            }
        }
    }

    /// Embedding dimensions of the wrapped provider
    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }
}
