//! Upload ingestion pipeline
//!
//! Orchestrates: persist bytes, extract text, gate, summarize, chunk,
//! embed, index, persist record. Only two steps may fail the upload: the
//! initial byte persist and the final record persist. Everything between
//! degrades - the document survives with placeholders instead of AI output.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::Result;
use crate::extraction::{hash_content, TextExtractor, MIN_EXTRACTED_CHARS};
use crate::generation::SummaryGateway;
use crate::providers::{BlobStore, EmbeddingGateway, VectorRecord};
use crate::retrieval::store::meta;
use crate::retrieval::VectorStore;
use crate::storage::DocumentRegistry;
use crate::types::Document;

use super::chunker::FixedSizeChunker;

/// A file received from the upload endpoint
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The ingestion pipeline wiring
pub struct IngestionPipeline {
    extractor: Arc<TextExtractor>,
    chunker: FixedSizeChunker,
    embeddings: Arc<EmbeddingGateway>,
    store: Arc<VectorStore>,
    summaries: Arc<SummaryGateway>,
    blobs: Arc<dyn BlobStore>,
    documents: Arc<DocumentRegistry>,
}

impl IngestionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        extractor: Arc<TextExtractor>,
        chunker: FixedSizeChunker,
        embeddings: Arc<EmbeddingGateway>,
        store: Arc<VectorStore>,
        summaries: Arc<SummaryGateway>,
        blobs: Arc<dyn BlobStore>,
        documents: Arc<DocumentRegistry>,
    ) -> Self {
        Self {
            extractor,
            chunker,
            embeddings,
            store,
            summaries,
            blobs,
            documents,
        }
    }

    /// Ingest one uploaded file for an owner.
    ///
    /// When the upload happened inside a session, the session id is stamped
    /// onto every chunk's metadata alongside the folder id.
    pub async fn ingest(
        &self,
        owner_id: &str,
        folder_id: Option<Uuid>,
        session_id: Option<Uuid>,
        upload: UploadedFile,
    ) -> Result<Document> {
        let started = Instant::now();
        let file_type = TextExtractor::resolve_file_type(&upload.file_name, &upload.mime_type);

        let mut doc = Document::new(
            owner_id.to_string(),
            upload.file_name.clone(),
            file_type,
            upload.mime_type.clone(),
            upload.bytes.len() as u64,
        );
        doc.folder_id = folder_id;

        // Persist the original bytes. This is one of the two fatal steps.
        doc.storage_uri = self
            .blobs
            .put(&format!("{}.bin", doc.id), &upload.bytes)
            .await?;

        // Extraction failure degrades the document instead of failing the upload
        let text = match self
            .extractor
            .extract(&upload.file_name, &upload.mime_type, &upload.bytes)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    file_name = upload.file_name,
                    "Extraction failed, persisting degraded document: {}",
                    e
                );
                self.documents.put(doc.clone())?;
                return Ok(doc);
            }
        };

        // Safety gate: too little text means OCR noise or a scanned page.
        // Persist what we have and skip every AI step.
        if text.trim().chars().count() < MIN_EXTRACTED_CHARS {
            tracing::info!(
                file_name = upload.file_name,
                extracted_chars = text.trim().chars().count(),
                "Extracted text below threshold, skipping summary and indexing"
            );
            doc.content = Some(text);
            self.documents.put(doc.clone())?;
            return Ok(doc);
        }

        doc.content_hash = hash_content(&text);

        if let Some(existing) = self.documents.find_by_hash(owner_id, &doc.content_hash) {
            tracing::info!(
                file_name = upload.file_name,
                existing = existing.file_name,
                "Identical content already ingested"
            );
        }

        // Plain-text rendition is best-effort
        match self
            .blobs
            .put(&format!("{}.txt", doc.id), text.as_bytes())
            .await
        {
            Ok(uri) => doc.preview_uri = Some(uri),
            Err(e) => tracing::warn!("Failed to store text rendition: {}", e),
        }

        // Summary degrades internally (quota message or None)
        doc.summary = self.summaries.summarize_or_placeholder(&text).await;

        // Chunk, embed, index. Chunks whose embedding fails are skipped;
        // an index failure leaves the document searchless but alive.
        let chunks = self.chunker.chunk_text(&text);
        let mut records = Vec::with_capacity(chunks.len());
        let mut skipped = 0usize;

        for (index, chunk) in chunks.iter().enumerate() {
            match self.embeddings.embed(chunk).await {
                Some(values) => records.push(VectorRecord {
                    id: format!("{}_{}", doc.vector_ref, index),
                    values,
                    metadata: chunk_metadata(&doc, session_id, chunk, index),
                }),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                file_name = upload.file_name,
                skipped,
                total = chunks.len(),
                "Some chunks could not be embedded"
            );
        }

        match self.store.upsert_batch(&records).await {
            Ok(()) => doc.chunk_count = records.len() as u32,
            Err(e) => tracing::warn!(
                file_name = upload.file_name,
                "Vector upsert failed, document will not be searchable: {}",
                e
            ),
        }

        doc.content = Some(text);

        // Persist the record. The second fatal step.
        self.documents.put(doc.clone())?;

        tracing::info!(
            file_name = upload.file_name,
            chunks = doc.chunk_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Document ingested"
        );
        Ok(doc)
    }

    /// Delete a document and everything derived from it.
    ///
    /// Blob and vector cleanup are best-effort; the record removal is what
    /// makes the delete real.
    pub async fn delete(&self, owner_id: &str, doc: &Document) -> Result<usize> {
        if let Err(e) = self.blobs.delete(&format!("{}.bin", doc.id)).await {
            tracing::warn!(document = %doc.id, "Failed to delete original blob: {}", e);
        }
        if doc.preview_uri.is_some() {
            if let Err(e) = self.blobs.delete(&format!("{}.txt", doc.id)).await {
                tracing::warn!(document = %doc.id, "Failed to delete text rendition: {}", e);
            }
        }

        let vectors_deleted = match self.store.delete_by_document(owner_id, &doc.vector_ref).await
        {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(document = %doc.id, "Vector cleanup failed: {}", e);
                0
            }
        };

        self.documents.remove(&doc.id, owner_id)?;
        Ok(vectors_deleted)
    }
}

fn chunk_metadata(
    doc: &Document,
    session_id: Option<Uuid>,
    chunk: &str,
    index: usize,
) -> HashMap<String, serde_json::Value> {
    let mut metadata = HashMap::new();
    metadata.insert(meta::TEXT.to_string(), json!(chunk));
    metadata.insert(meta::DOCUMENT_ID.to_string(), json!(doc.vector_ref));
    metadata.insert(meta::OWNER_ID.to_string(), json!(doc.owner_id));
    metadata.insert(meta::FILE_NAME.to_string(), json!(doc.file_name));
    metadata.insert(meta::CHUNK_INDEX.to_string(), json!(index));
    if let Some(folder_id) = doc.folder_id {
        metadata.insert(meta::FOLDER_ID.to_string(), json!(folder_id.to_string()));
    }
    if let Some(session_id) = session_id {
        metadata.insert(meta::SESSION_ID.to_string(), json!(session_id.to_string()));
    }
    metadata
}
