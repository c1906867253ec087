//! Configuration for the document vault

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Local rate limiter configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Vector index configuration
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    /// Metadata/blob storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// OCR configuration
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Gemini API configuration (embeddings + generation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually injected via GEMINI_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Generation model name
    pub generate_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            embed_model: "gemini-embedding-001".to_string(),
            dimensions: 3072,
            generate_model: "gemini-2.0-flash".to_string(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunk size in characters (fixed-size, non-overlapping)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    1000
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Maximum assembled context length in characters
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_max_context_chars() -> usize {
    30_000
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// Local sliding-window rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests inside the window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> usize {
    15
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// In-process brute-force index (development, tests)
    #[default]
    Memory,
    /// Pinecone serverless REST index
    Pinecone,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    /// Which backend to use
    #[serde(default)]
    pub backend: VectorBackend,
    /// Pinecone index host URL (e.g. "https://my-index-abc123.svc.pinecone.io")
    #[serde(default)]
    pub pinecone_host: String,
    /// Pinecone API key (usually injected via PINECONE_API_KEY)
    #[serde(default)]
    pub pinecone_api_key: String,
    /// Ceiling for the delete-by-document query emulation
    #[serde(default = "default_delete_scan_limit")]
    pub delete_scan_limit: usize,
}

fn default_delete_scan_limit() -> usize {
    1000
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Memory,
            pinecone_host: String::new(),
            pinecone_api_key: std::env::var("PINECONE_API_KEY").unwrap_or_default(),
            delete_scan_limit: default_delete_scan_limit(),
        }
    }
}

/// Metadata registry and blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory (registries + blobs)
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyvault");

        Self { data_dir }
    }
}

/// OCR configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Enable OCR for image uploads
    #[serde(default = "default_ocr_enabled")]
    pub enabled: bool,
    /// Path to the tesseract binary
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Recognition language
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

fn default_ocr_enabled() -> bool {
    true
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: default_ocr_enabled(),
            tesseract_path: default_tesseract_path(),
            language: default_ocr_language(),
        }
    }
}
