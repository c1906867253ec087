//! Provider abstractions for embeddings, generation, vector indexing, and blob storage
//!
//! Trait-based seams so the hosted backends (Gemini, Pinecone) can be swapped
//! for in-process implementations in tests and local development.

pub mod blob_store;
pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod memory;
pub mod pinecone;
pub mod vector_index;

pub use blob_store::{BlobStore, LocalBlobStore};
pub use embedding::{EmbeddingGateway, EmbeddingProvider};
pub use gemini::GeminiClient;
pub use llm::GenerativeProvider;
pub use memory::InMemoryIndex;
pub use pinecone::PineconeIndex;
pub use vector_index::{MetadataFilter, QueryMatch, VectorIndexProvider, VectorRecord};
