//! Response payload types

use serde::Serialize;
use uuid::Uuid;

use super::document::{Document, FileType};
use super::session::Message;

/// Document view returned by list/upload endpoints (raw content omitted)
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: FileType,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub storage_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    pub chunk_count: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Document> for DocumentView {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            file_name: doc.file_name.clone(),
            file_type: doc.file_type.clone(),
            mime_type: doc.mime_type.clone(),
            size_bytes: doc.size_bytes,
            summary: doc.summary.clone(),
            storage_uri: doc.storage_uri.clone(),
            preview_uri: doc.preview_uri.clone(),
            folder_id: doc.folder_id,
            chunk_count: doc.chunk_count,
            created_at: doc.created_at,
        }
    }
}

/// One scored match from the drive search endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub document_id: Uuid,
    pub file_name: String,
    pub snippet: String,
    pub score: f32,
}

/// Chat endpoint response
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub message: Message,
}

/// Delete endpoint response
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub id: Uuid,
    pub vectors_deleted: usize,
}
