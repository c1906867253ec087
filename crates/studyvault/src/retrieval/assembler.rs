//! Context assembly for grounded generation

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingGateway, QueryMatch};

use super::store::{meta, ChunkFilter, VectorStore};

/// Separator between chunks in assembled context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Embeds a query, retrieves the nearest chunks, and assembles their text
/// into a single deduplicated, budget-capped context string.
pub struct RetrievalAssembler {
    embeddings: Arc<EmbeddingGateway>,
    store: Arc<VectorStore>,
    top_k: usize,
    max_context_chars: usize,
}

impl RetrievalAssembler {
    pub fn new(
        embeddings: Arc<EmbeddingGateway>,
        store: Arc<VectorStore>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embeddings,
            store,
            top_k: config.top_k,
            max_context_chars: config.max_context_chars,
        }
    }

    /// Top matches for a query; empty when the query cannot be embedded
    pub async fn top_matches(&self, query: &str, filter: &ChunkFilter) -> Result<Vec<QueryMatch>> {
        let Some(vector) = self.embeddings.embed(query).await else {
            tracing::warn!("Query could not be embedded, returning no matches");
            return Ok(Vec::new());
        };

        self.store.query(&vector, self.top_k, filter).await
    }

    /// Assemble context text for a query.
    ///
    /// Chunk texts are deduplicated exactly (first occurrence wins, order
    /// preserved), joined with the separator, and truncated to the budget.
    pub async fn assemble(&self, query: &str, filter: &ChunkFilter) -> Result<String> {
        let matches = self.top_matches(query, filter).await?;
        Ok(self.assemble_from_matches(&matches))
    }

    /// Assemble context from already-retrieved matches
    pub fn assemble_from_matches(&self, matches: &[QueryMatch]) -> String {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut texts: Vec<&str> = Vec::new();

        for m in matches {
            if let Some(text) = m.metadata_str(meta::TEXT) {
                if seen.insert(text) {
                    texts.push(text);
                }
            }
        }

        let joined = texts.join(CONTEXT_SEPARATOR);
        truncate_chars(&joined, self.max_context_chars)
    }
}

/// Truncate to a character budget without splitting a multi-byte character
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorIndexConfig;
    use crate::error::Error;
    use crate::providers::{EmbeddingProvider, InMemoryIndex, VectorIndexProvider, VectorRecord};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct StubEmbedder {
        vector: Option<Vec<f32>>,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            self.vector
                .clone()
                .ok_or_else(|| Error::Embedding("down".to_string()))
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> crate::error::Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn record(id: &str, text: &str, values: Vec<f32>) -> VectorRecord {
        let mut metadata = HashMap::new();
        metadata.insert(meta::TEXT.to_string(), json!(text));
        metadata.insert(meta::OWNER_ID.to_string(), json!("u1"));
        metadata.insert(meta::DOCUMENT_ID.to_string(), json!("d1"));
        VectorRecord {
            id: id.to_string(),
            values,
            metadata,
        }
    }

    async fn assembler_with(
        records: &[VectorRecord],
        embed_vector: Option<Vec<f32>>,
        config: RetrievalConfig,
    ) -> RetrievalAssembler {
        let index = Arc::new(InMemoryIndex::new(2));
        index.upsert(records).await.unwrap();
        let store = Arc::new(VectorStore::new(index, &VectorIndexConfig::default()));
        let embeddings = Arc::new(EmbeddingGateway::new(Arc::new(StubEmbedder {
            vector: embed_vector,
        })));
        RetrievalAssembler::new(embeddings, store, &config)
    }

    #[tokio::test]
    async fn assembles_joined_context() {
        let assembler = assembler_with(
            &[
                record("a", "first chunk", vec![1.0, 0.0]),
                record("b", "second chunk", vec![0.9, 0.1]),
            ],
            Some(vec![1.0, 0.0]),
            RetrievalConfig::default(),
        )
        .await;

        let context = assembler
            .assemble("query", &ChunkFilter::for_owner("u1"))
            .await
            .unwrap();
        assert_eq!(context, format!("first chunk{}second chunk", CONTEXT_SEPARATOR));
    }

    #[tokio::test]
    async fn exact_duplicate_texts_are_deduplicated_in_order() {
        let assembler = assembler_with(
            &[
                record("a", "same text", vec![1.0, 0.0]),
                record("b", "same text", vec![0.99, 0.01]),
                record("c", "other text", vec![0.9, 0.1]),
            ],
            Some(vec![1.0, 0.0]),
            RetrievalConfig::default(),
        )
        .await;

        let context = assembler
            .assemble("query", &ChunkFilter::for_owner("u1"))
            .await
            .unwrap();
        assert_eq!(context, format!("same text{}other text", CONTEXT_SEPARATOR));
    }

    #[tokio::test]
    async fn unembeddable_query_yields_empty_context() {
        let assembler = assembler_with(
            &[record("a", "chunk", vec![1.0, 0.0])],
            None,
            RetrievalConfig::default(),
        )
        .await;

        let context = assembler
            .assemble("query", &ChunkFilter::for_owner("u1"))
            .await
            .unwrap();
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn context_is_capped_at_budget() {
        let big = "x".repeat(400);
        let assembler = assembler_with(
            &[
                record("a", &big, vec![1.0, 0.0]),
                record("b", &format!("{}b", big), vec![0.9, 0.1]),
            ],
            Some(vec![1.0, 0.0]),
            RetrievalConfig {
                top_k: 5,
                max_context_chars: 500,
            },
        )
        .await;

        let context = assembler
            .assemble("query", &ChunkFilter::for_owner("u1"))
            .await
            .unwrap();
        assert_eq!(context.chars().count(), 500);
    }

    #[tokio::test]
    async fn top_k_limits_retrieved_matches() {
        let records: Vec<VectorRecord> = (0..10)
            .map(|i| record(&format!("r{}", i), &format!("text {}", i), vec![1.0, 0.0]))
            .collect();
        let assembler = assembler_with(
            &records,
            Some(vec![1.0, 0.0]),
            RetrievalConfig {
                top_k: 5,
                max_context_chars: 30_000,
            },
        )
        .await;

        let matches = assembler
            .top_matches("query", &ChunkFilter::for_owner("u1"))
            .await
            .unwrap();
        assert_eq!(matches.len(), 5);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
