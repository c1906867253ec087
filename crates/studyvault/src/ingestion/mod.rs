//! Document ingestion: chunking and the upload pipeline

pub mod chunker;
pub mod pipeline;

pub use chunker::FixedSizeChunker;
pub use pipeline::{IngestionPipeline, UploadedFile};
