//! Vector retrieval: the store facade and context assembly

pub mod assembler;
pub mod store;

pub use assembler::RetrievalAssembler;
pub use store::{ChunkFilter, VectorStore};
