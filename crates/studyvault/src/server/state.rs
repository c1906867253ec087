//! Application state for the vault server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::{AppConfig, VectorBackend};
use crate::error::Result;
use crate::extraction::{TesseractOcr, TextExtractor};
use crate::generation::{ResponseComposer, SlidingWindowLimiter, SummaryGateway};
use crate::ingestion::{FixedSizeChunker, IngestionPipeline};
use crate::providers::{
    BlobStore, EmbeddingGateway, EmbeddingProvider, GeminiClient, GenerativeProvider,
    InMemoryIndex, LocalBlobStore, PineconeIndex, VectorIndexProvider,
};
use crate::retrieval::{RetrievalAssembler, VectorStore};
use crate::storage::{DocumentRegistry, SessionRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Upload ingestion pipeline
    pipeline: Arc<IngestionPipeline>,
    /// Query-side retrieval
    assembler: Arc<RetrievalAssembler>,
    /// Chat and session-intro generation
    composer: Arc<ResponseComposer>,
    /// Document registry (persisted to disk)
    documents: Arc<DocumentRegistry>,
    /// Session registry (persisted to disk)
    sessions: Arc<SessionRegistry>,
    /// Embedding provider, kept for health checks
    embedder: Arc<dyn EmbeddingProvider>,
    /// LLM provider, kept for health checks
    llm: Arc<dyn GenerativeProvider>,
    /// Ready state, flipped by the server once it is bound and serving
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with the configured hosted providers
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing vault application state...");

        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        let embedder: Arc<dyn EmbeddingProvider> = gemini.clone();
        let llm: Arc<dyn GenerativeProvider> = gemini;

        let index: Arc<dyn VectorIndexProvider> = match config.vector_index.backend {
            VectorBackend::Memory => {
                tracing::info!("Using in-memory vector index");
                Arc::new(InMemoryIndex::new(config.gemini.dimensions))
            }
            VectorBackend::Pinecone => {
                tracing::info!("Using Pinecone index at {}", config.vector_index.pinecone_host);
                Arc::new(PineconeIndex::new(
                    &config.vector_index,
                    config.gemini.dimensions,
                )?)
            }
        };

        let blobs: Arc<dyn BlobStore> =
            Arc::new(LocalBlobStore::new(config.storage.data_dir.join("blobs"))?);

        Self::with_providers(config, embedder, llm, index, blobs)
    }

    /// Create application state with explicit providers.
    ///
    /// This is the wiring point: production passes the hosted providers,
    /// tests pass mocks.
    pub fn with_providers(
        config: AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn GenerativeProvider>,
        index: Arc<dyn VectorIndexProvider>,
        blobs: Arc<dyn BlobStore>,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.data_dir)?;

        let documents = Arc::new(DocumentRegistry::open(
            config.storage.data_dir.join("documents.json"),
        ));
        let sessions = Arc::new(SessionRegistry::open(
            config.storage.data_dir.join("sessions.json"),
        ));

        let gateway = Arc::new(EmbeddingGateway::new(embedder.clone()));
        let store = Arc::new(VectorStore::new(index, &config.vector_index));

        let limiter = Arc::new(SlidingWindowLimiter::new(&config.rate_limit));
        let summaries = Arc::new(SummaryGateway::new(llm.clone(), limiter));

        let ocr = Arc::new(TesseractOcr::new(config.ocr.clone()));
        let extractor = Arc::new(TextExtractor::new(ocr));

        let pipeline = Arc::new(IngestionPipeline::new(
            extractor,
            FixedSizeChunker::from_config(&config.chunking),
            gateway.clone(),
            store.clone(),
            summaries,
            blobs,
            documents.clone(),
        ));

        let assembler = Arc::new(RetrievalAssembler::new(gateway, store, &config.retrieval));
        let composer = Arc::new(ResponseComposer::new(llm.clone()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                assembler,
                composer,
                documents,
                sessions,
                embedder,
                llm,
                ready: RwLock::new(false),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &Arc<IngestionPipeline> {
        &self.inner.pipeline
    }

    /// Get the retrieval assembler
    pub fn assembler(&self) -> &Arc<RetrievalAssembler> {
        &self.inner.assembler
    }

    /// Get the response composer
    pub fn composer(&self) -> &Arc<ResponseComposer> {
        &self.inner.composer
    }

    /// Get the document registry
    pub fn documents(&self) -> &Arc<DocumentRegistry> {
        &self.inner.documents
    }

    /// Get the session registry
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.inner.sessions
    }

    /// Get the embedding provider (for health checks)
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the LLM provider (for health checks)
    pub fn llm(&self) -> &Arc<dyn GenerativeProvider> {
        &self.inner.llm
    }

    /// Check if the server is ready to serve traffic
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state; false until the listener is bound
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
