//! StudyVault: a document vault with AI-assisted study sessions
//!
//! Uploads are extracted, summarized, chunked, embedded, and indexed in a
//! vector store. Study sessions ground an LLM chat in a chosen set of
//! documents, with strict degradation rules: AI failures never lose a
//! user's upload.

pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use extraction::TextExtractor;
pub use generation::{ResponseComposer, SummaryGateway};
pub use ingestion::{FixedSizeChunker, IngestionPipeline, UploadedFile};
pub use providers::{EmbeddingGateway, EmbeddingProvider, GenerativeProvider, VectorIndexProvider};
pub use retrieval::{ChunkFilter, RetrievalAssembler, VectorStore};
pub use server::VaultServer;
pub use types::{Document, FileType, Message, Role, Session};
