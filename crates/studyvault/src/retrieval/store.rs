//! Tenant-scoped facade over the vector index

use std::sync::Arc;
use uuid::Uuid;

use crate::config::VectorIndexConfig;
use crate::error::Result;
use crate::providers::{MetadataFilter, QueryMatch, VectorIndexProvider, VectorRecord};

/// Metadata keys written on chunk records. `SESSION_ID` and `FOLDER_ID`
/// are present only when the upload carried them.
pub mod meta {
    pub const TEXT: &str = "text";
    pub const DOCUMENT_ID: &str = "document_id";
    pub const OWNER_ID: &str = "owner_id";
    pub const FILE_NAME: &str = "file_name";
    pub const CHUNK_INDEX: &str = "chunk_index";
    pub const SESSION_ID: &str = "session_id";
    pub const FOLDER_ID: &str = "folder_id";
}

/// Query scope: every query carries the owner, optionally narrowed to a
/// document set. There is no constructor for an owner-less filter, so an
/// unscoped cross-tenant query cannot be expressed.
#[derive(Debug, Clone)]
pub struct ChunkFilter {
    owner_id: String,
    document_ids: Option<Vec<Uuid>>,
}

impl ChunkFilter {
    /// All of an owner's chunks
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            document_ids: None,
        }
    }

    /// Narrow to a set of documents (by vector_ref / document id)
    pub fn with_documents(mut self, document_ids: Vec<Uuid>) -> Self {
        self.document_ids = Some(document_ids);
        self
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn to_metadata_filter(&self) -> MetadataFilter {
        let mut filter = MetadataFilter::none().with_eq(meta::OWNER_ID, self.owner_id.clone());
        if let Some(ids) = &self.document_ids {
            filter = filter.with_any_of(
                meta::DOCUMENT_ID,
                ids.iter().map(|id| id.to_string()).collect(),
            );
        }
        filter
    }
}

/// Facade over a [`VectorIndexProvider`] implementing the vault's access
/// patterns: batch upsert, owner-scoped query, and delete-by-document.
pub struct VectorStore {
    index: Arc<dyn VectorIndexProvider>,
    delete_scan_limit: usize,
}

impl VectorStore {
    pub fn new(index: Arc<dyn VectorIndexProvider>, config: &VectorIndexConfig) -> Self {
        Self {
            index,
            delete_scan_limit: config.delete_scan_limit,
        }
    }

    /// Upsert a batch of chunk records; an empty batch is a no-op
    pub async fn upsert_batch(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            tracing::debug!("Skipping upsert of empty batch");
            return Ok(());
        }
        self.index.upsert(records).await
    }

    /// Similarity query scoped by a [`ChunkFilter`]
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &ChunkFilter,
    ) -> Result<Vec<QueryMatch>> {
        self.index
            .query(vector, top_k, &filter.to_metadata_filter())
            .await
    }

    /// Delete every vector belonging to a document.
    ///
    /// The index has no delete-by-filter operation, so this runs a filtered
    /// query with a dummy zero vector to collect ids, then deletes them.
    /// Zero matches is not an error: the document may have been degraded at
    /// ingestion and never indexed.
    pub async fn delete_by_document(&self, owner_id: &str, vector_ref: &str) -> Result<usize> {
        let dummy = vec![0.0; self.index.dimensions()];
        let filter = MetadataFilter::none()
            .with_eq(meta::OWNER_ID, owner_id)
            .with_eq(meta::DOCUMENT_ID, vector_ref);

        let matches = self
            .index
            .query(&dummy, self.delete_scan_limit, &filter)
            .await?;

        if matches.is_empty() {
            tracing::info!(vector_ref, "No vectors found for document, nothing to delete");
            return Ok(0);
        }

        if matches.len() >= self.delete_scan_limit {
            tracing::warn!(
                vector_ref,
                limit = self.delete_scan_limit,
                "Delete scan hit its ceiling; some vectors may remain"
            );
        }

        let ids: Vec<String> = matches.into_iter().map(|m| m.id).collect();
        let deleted = ids.len();
        self.index.delete_by_ids(&ids).await?;

        tracing::info!(vector_ref, deleted, "Deleted document vectors");
        Ok(deleted)
    }

    /// Embedding dimensions of the underlying index
    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }
}
