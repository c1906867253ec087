//! Pinecone serverless REST index adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::VectorIndexConfig;
use crate::error::{Error, Result};

use super::vector_index::{MetadataFilter, QueryMatch, VectorIndexProvider, VectorRecord};

/// REST adapter for a Pinecone serverless index
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(rename = "totalVectorCount", default)]
    total_vector_count: usize,
}

impl PineconeIndex {
    /// Create an adapter from configuration
    pub fn new(config: &VectorIndexConfig, dimensions: usize) -> Result<Self> {
        if config.pinecone_host.is_empty() {
            return Err(Error::Config(
                "Pinecone backend selected but pinecone_host is empty".to_string(),
            ));
        }
        if config.pinecone_api_key.is_empty() {
            return Err(Error::Config(
                "Pinecone backend selected but no API key is configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host: config.pinecone_host.trim_end_matches('/').to_string(),
            api_key: config.pinecone_api_key.clone(),
            dimensions,
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "{} failed: HTTP {} - {}",
                path, status, text
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let vectors: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "values": r.values,
                    "metadata": r.metadata,
                })
            })
            .collect();

        self.post("/vectors/upsert", json!({ "vectors": vectors }))
            .await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<QueryMatch>> {
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if !filter.is_empty() {
            body["filter"] = filter.to_wire();
        }

        let response = self.post("/query", body).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse query response: {}", e)))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| QueryMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.post("/vectors/delete", json!({ "ids": ids })).await?;
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let response = self.post("/describe_index_stats", json!({})).await?;
        let stats: StatsResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse stats response: {}", e)))?;
        Ok(stats.total_vector_count)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.len().await.is_ok())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
