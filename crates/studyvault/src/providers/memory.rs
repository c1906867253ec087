//! In-process brute-force vector index
//!
//! Backs local development and tests. Cosine similarity over every stored
//! record, which is fine at the scale a single user's documents reach.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;

use super::vector_index::{MetadataFilter, QueryMatch, VectorIndexProvider, VectorRecord};

/// Brute-force cosine index held in a concurrent map
pub struct InMemoryIndex {
    records: DashMap<String, VectorRecord>,
    dimensions: usize,
}

impl InMemoryIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            records: DashMap::new(),
            dimensions,
        }
    }
}

/// Cosine similarity; zero-norm inputs score 0.0 so a dummy all-zero query
/// still returns (arbitrarily ordered) matches.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndexProvider for InMemoryIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        for record in records {
            self.records.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<QueryMatch>> {
        let mut matches: Vec<QueryMatch> = self
            .records
            .iter()
            .filter(|entry| filter.matches(&entry.value().metadata))
            .map(|entry| {
                let record = entry.value();
                QueryMatch {
                    id: record.id.clone(),
                    score: cosine_similarity(vector, &record.values),
                    metadata: record.metadata.clone(),
                }
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.records.remove(id);
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "memory"
    }
}
