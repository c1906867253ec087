//! Vector index provider trait for storing and searching embeddings

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

use crate::error::Result;

/// A vector plus its metadata, as stored in the index
#[derive(Debug, Clone)]
pub struct VectorRecord {
    /// Stable record id (e.g. "{vector_ref}_{chunk_index}")
    pub id: String,
    /// Embedding values
    pub values: Vec<f32>,
    /// Flat metadata map (chunk text, document/owner ids, filename, index)
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A scored match from a similarity query
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl QueryMatch {
    /// Metadata value as a string, if present and a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Metadata filter applied during similarity queries
///
/// `equals` clauses must all match; each `any_of` clause matches when the
/// field equals one of the listed values. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub equals: Vec<(String, String)>,
    pub any_of: Vec<(String, Vec<String>)>,
}

impl MetadataFilter {
    /// Filter matching every record
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a field-equals clause
    pub fn with_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    /// Add a field-in-set clause
    pub fn with_any_of(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.any_of.push((field.into(), values));
        self
    }

    /// True when no clauses are present
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.any_of.is_empty()
    }

    /// Evaluate the filter against a metadata map
    pub fn matches(&self, metadata: &HashMap<String, serde_json::Value>) -> bool {
        for (field, value) in &self.equals {
            if metadata.get(field).and_then(|v| v.as_str()) != Some(value.as_str()) {
                return false;
            }
        }
        for (field, values) in &self.any_of {
            let found = metadata
                .get(field)
                .and_then(|v| v.as_str())
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }
        true
    }

    /// Serialize to the `$eq` / `$in` wire format used by hosted indexes
    pub fn to_wire(&self) -> serde_json::Value {
        let mut filter = serde_json::Map::new();
        for (field, value) in &self.equals {
            filter.insert(field.clone(), json!({ "$eq": value }));
        }
        for (field, values) in &self.any_of {
            filter.insert(field.clone(), json!({ "$in": values }));
        }
        serde_json::Value::Object(filter)
    }
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `InMemoryIndex`: in-process brute-force cosine index
/// - `PineconeIndex`: serverless REST index
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Upsert a batch of records
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Query for similar vectors, metadata included in matches
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<QueryMatch>>;

    /// Delete records by id
    async fn delete_by_ids(&self, ids: &[String]) -> Result<()>;

    /// Total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if the index is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Embedding dimensions the index expects
    fn dimensions(&self) -> usize;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
