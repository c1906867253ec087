//! Document types for uploaded files

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain text file
    Txt,
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Excel spreadsheet (.xlsx)
    Xlsx,
    /// Comma-separated values
    Csv,
    /// Image (routed through OCR)
    Image,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" | "md" => Self::Txt,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "xlsx" => Self::Xlsx,
            "csv" => Self::Csv,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tiff" | "tif" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a MIME type string
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "text/plain" | "text/markdown" => Self::Txt,
            "application/pdf" => Self::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Self::Docx,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Self::Xlsx,
            "text/csv" => Self::Csv,
            m if m.starts_with("image/") => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Txt => "Text File",
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Xlsx => "Excel Spreadsheet (.xlsx)",
            Self::Csv => "CSV",
            Self::Image => "Image",
            Self::Unknown => "Unknown",
        }
    }
}

/// An uploaded document and its derived artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Owning user
    pub owner_id: String,
    /// Original filename as uploaded
    pub file_name: String,
    /// File type
    pub file_type: FileType,
    /// Declared MIME type
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Hash of the extracted text, for deduplication
    pub content_hash: String,
    /// Extracted plain text (None when extraction produced nothing usable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// AI-generated summary (None for degraded documents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Blob store URI of the original bytes
    pub storage_uri: String,
    /// Blob store URI of the plain-text rendition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_uri: Option<String>,
    /// Optional folder grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    /// Correlation key for this document's vectors in the index
    pub vector_ref: String,
    /// Number of chunks indexed (0 for degraded documents)
    #[serde(default)]
    pub chunk_count: u32,
    /// Upload timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(
        owner_id: String,
        file_name: String,
        file_type: FileType,
        mime_type: String,
        size_bytes: u64,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            owner_id,
            file_name,
            file_type,
            mime_type,
            size_bytes,
            content_hash: String::new(),
            content: None,
            summary: None,
            storage_uri: String::new(),
            preview_uri: None,
            folder_id: None,
            vector_ref: id.to_string(),
            chunk_count: 0,
            created_at: chrono::Utc::now(),
        }
    }
}
