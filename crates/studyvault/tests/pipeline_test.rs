//! End-to-end tests over the full wiring with mock providers

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use studyvault::config::AppConfig;
use studyvault::error::{Error, Result};
use studyvault::ingestion::UploadedFile;
use studyvault::providers::{
    BlobStore, EmbeddingProvider, GenerativeProvider, InMemoryIndex, LocalBlobStore,
    VectorIndexProvider,
};
use studyvault::retrieval::store::meta;
use studyvault::retrieval::ChunkFilter;
use studyvault::server::state::AppState;
use studyvault::types::Session;
use uuid::Uuid;

const DIMS: usize = 4;

/// Deterministic embedder: maps keyword presence onto fixed axes so related
/// texts land near each other. Texts containing "ZEROVEC" produce an
/// all-zero vector, texts containing "EMBEDFAIL" produce an error.
struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("EMBEDFAIL") {
            return Err(Error::Embedding("mock failure".to_string()));
        }
        if text.contains("ZEROVEC") {
            return Ok(vec![0.0; DIMS]);
        }

        let mut v = vec![0.0f32; DIMS];
        if text.to_lowercase().contains("capital") {
            v[0] = 1.0;
        }
        if text.to_lowercase().contains("cheese") {
            v[1] = 1.0;
        }
        if text.to_lowercase().contains("history") {
            v[2] = 1.0;
        }
        v[3] = 0.1;
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Scripted LLM: answers by prompt shape, counts calls per kind
struct MockLlm {
    summary_calls: AtomicUsize,
    intro_calls: AtomicUsize,
    chat_calls: AtomicUsize,
    fail_generation: bool,
}

impl MockLlm {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            summary_calls: AtomicUsize::new(0),
            intro_calls: AtomicUsize::new(0),
            chat_calls: AtomicUsize::new(0),
            fail_generation: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            summary_calls: AtomicUsize::new(0),
            intro_calls: AtomicUsize::new(0),
            chat_calls: AtomicUsize::new(0),
            fail_generation: true,
        })
    }

    fn total_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
            + self.intro_calls.load(Ordering::SeqCst)
            + self.chat_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeProvider for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.fail_generation {
            return Err(Error::Llm("mock backend down".to_string()));
        }

        if prompt.starts_with("Summarize the following text") {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            Ok("- point one\n- point two\n- point three".to_string())
        } else if prompt.contains("raw JSON") {
            self.intro_calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"title": "France Facts", "summary": "Ask me about France."}"#.to_string())
        } else {
            self.chat_calls.fetch_add(1, Ordering::SeqCst);
            Ok("**Paris** is the capital of France.".to_string())
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-llm"
    }
}

struct Fixture {
    state: AppState,
    embedder: Arc<MockEmbedder>,
    llm: Arc<MockLlm>,
    index: Arc<InMemoryIndex>,
    _dir: tempfile::TempDir,
}

fn fixture_with(llm: Arc<MockLlm>) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.gemini.dimensions = DIMS;
    config.chunking.chunk_size = 1000;

    let embedder = MockEmbedder::new();
    let index = Arc::new(InMemoryIndex::new(DIMS));
    let blobs: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(dir.path().join("blobs")).expect("blob store"));

    let state = AppState::with_providers(
        config,
        embedder.clone(),
        llm.clone(),
        index.clone(),
        blobs,
    )
    .expect("state");

    Fixture {
        state,
        embedder,
        llm,
        index,
        _dir: dir,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockLlm::new())
}

fn txt_upload(name: &str, content: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        mime_type: "text/plain".to_string(),
        bytes: content.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn ingest_extracts_summarizes_and_indexes() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    assert_eq!(doc.summary.as_deref(), Some("- point one\n- point two\n- point three"));
    assert_eq!(doc.chunk_count, 1);
    assert!(!doc.content_hash.is_empty());
    assert!(doc.storage_uri.starts_with("file://"));
    assert!(doc.preview_uri.is_some());
    assert_eq!(f.index.len().await.unwrap(), 1);
    assert!(f.state.documents().get(&doc.id, "u1").is_some());
}

#[tokio::test]
async fn short_extraction_skips_all_ai_calls() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest("u1", None, None, txt_upload("tiny.txt", "hi"))
        .await
        .unwrap();

    // Document persisted, but degraded: no summary, no vectors
    assert!(doc.summary.is_none());
    assert_eq!(doc.chunk_count, 0);
    assert!(f.state.documents().get(&doc.id, "u1").is_some());

    // The safety gate means neither provider was ever called
    assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.llm.total_calls(), 0);
    assert_eq!(f.index.len().await.unwrap(), 0);
}

#[tokio::test]
async fn extraction_failure_persists_degraded_document() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            UploadedFile {
                file_name: "broken.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                bytes: b"this is not a pdf".to_vec(),
            },
        )
        .await
        .unwrap();

    assert!(doc.content.is_none());
    assert!(doc.summary.is_none());
    assert_eq!(doc.chunk_count, 0);
    assert!(f.state.documents().get(&doc.id, "u1").is_some());
    assert_eq!(f.llm.total_calls(), 0);
}

#[tokio::test]
async fn unembeddable_chunks_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.gemini.dimensions = DIMS;
    // Small chunks so the text splits into good and bad chunks
    config.chunking.chunk_size = 500;

    let embedder = MockEmbedder::new();
    let index = Arc::new(InMemoryIndex::new(DIMS));
    let blobs: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(dir.path().join("blobs")).unwrap());
    let state =
        AppState::with_providers(config, embedder.clone(), MockLlm::new(), index.clone(), blobs)
            .unwrap();

    // The first chunk embeds fine, every later chunk yields an all-zero vector
    let mut text = "The capital of France is Paris. ".repeat(16);
    text.push_str(&"ZEROVEC padding text here. ".repeat(40));

    let doc = state
        .pipeline()
        .ingest("u1", None, None, txt_upload("mixed.txt", &text))
        .await
        .unwrap();

    let total_chunks = text.chars().count().div_ceil(500);
    assert!(doc.chunk_count > 0);
    assert!((doc.chunk_count as usize) < total_chunks);
    assert_eq!(index.len().await.unwrap(), doc.chunk_count as usize);
}

#[tokio::test]
async fn chunk_metadata_records_folder_and_session() {
    let f = fixture();
    let folder_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();
    f.state
        .pipeline()
        .ingest(
            "u1",
            Some(folder_id),
            Some(session_id),
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    let matches = f
        .state
        .assembler()
        .top_matches("capital", &ChunkFilter::for_owner("u1"))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.metadata_str(meta::FOLDER_ID), Some(folder_id.to_string().as_str()));
    assert_eq!(m.metadata_str(meta::SESSION_ID), Some(session_id.to_string().as_str()));
}

#[tokio::test]
async fn upload_outside_a_session_omits_the_optional_keys() {
    let f = fixture();
    f.state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    let matches = f
        .state
        .assembler()
        .top_matches("capital", &ChunkFilter::for_owner("u1"))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].metadata_str(meta::FOLDER_ID).is_none());
    assert!(matches[0].metadata_str(meta::SESSION_ID).is_none());
}

#[tokio::test]
async fn delete_removes_vectors_and_record() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();
    assert_eq!(f.index.len().await.unwrap(), 1);

    let deleted = f.state.pipeline().delete("u1", &doc).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(f.index.len().await.unwrap(), 0);
    assert!(f.state.documents().get(&doc.id, "u1").is_none());
}

#[tokio::test]
async fn delete_of_degraded_document_succeeds_with_zero_vectors() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest("u1", None, None, txt_upload("tiny.txt", "hi"))
        .await
        .unwrap();

    let deleted = f.state.pipeline().delete("u1", &doc).await.unwrap();
    assert_eq!(deleted, 0);
    assert!(f.state.documents().get(&doc.id, "u1").is_none());
}

#[tokio::test]
async fn retrieval_is_tenant_isolated() {
    let f = fixture();
    f.state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();
    f.state
        .pipeline()
        .ingest(
            "u2",
            None,
            None,
            txt_upload("cheese.txt", "French capital cheese facts and more."),
        )
        .await
        .unwrap();

    let matches = f
        .state
        .assembler()
        .top_matches("capital of France", &ChunkFilter::for_owner("u1"))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);

    let context = f
        .state
        .assembler()
        .assemble("capital of France", &ChunkFilter::for_owner("u1"))
        .await
        .unwrap();
    assert!(context.contains("Paris"));
    assert!(!context.contains("cheese"));
}

#[tokio::test]
async fn chat_flow_answers_from_sources() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    let filter = ChunkFilter::for_owner("u1").with_documents(vec![doc.id]);
    let context = f
        .state
        .assembler()
        .assemble("What is the capital of France?", &filter)
        .await
        .unwrap();
    assert!(context.contains("The capital of France is Paris."));

    let reply = f
        .state
        .composer()
        .compose("What is the capital of France?", &context, None)
        .await;
    assert_eq!(reply, "**Paris** is the capital of France.");
}

#[tokio::test]
async fn generation_failure_becomes_wait_message_reply() {
    let f = fixture_with(MockLlm::failing());
    let reply = f
        .state
        .composer()
        .compose("What is the capital of France?", "some context", None)
        .await;
    assert!(reply.starts_with("Maximum number of requests exceeded"));
}

#[tokio::test]
async fn session_intro_is_generated_once() {
    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    let intro = f
        .state
        .composer()
        .compose_session_intro(doc.summary.as_deref().unwrap_or(""))
        .await;
    assert_eq!(intro.title, "France Facts");

    let mut session = Session::new("u1".to_string(), vec![doc.id]);
    session.name = intro.title.clone();
    session.ai_title = intro.title;
    session.ai_summary = intro.summary;
    f.state.sessions().put(session.clone()).unwrap();

    let intro_calls_after_create = f.llm.intro_calls.load(Ordering::SeqCst);
    assert_eq!(intro_calls_after_create, 1);

    // Adding a second source must not regenerate the intro
    let second = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("history.txt", "A short history of the French republic."),
        )
        .await
        .unwrap();

    let added = f
        .state
        .sessions()
        .update(&session.id, "u1", |s| s.add_sources(&[second.id]))
        .unwrap();
    assert_eq!(added, 1);

    // Idempotent: adding again is a no-op
    let added_again = f
        .state
        .sessions()
        .update(&session.id, "u1", |s| s.add_sources(&[second.id]))
        .unwrap();
    assert_eq!(added_again, 0);

    let stored = f.state.sessions().get(&session.id, "u1").unwrap();
    assert_eq!(stored.ai_title, "France Facts");
    assert_eq!(stored.source_documents.len(), 2);
    assert_eq!(f.llm.intro_calls.load(Ordering::SeqCst), intro_calls_after_create);
}

#[tokio::test]
async fn replace_last_assistant_message_round_trip() {
    let f = fixture();
    let mut session = Session::new("u1".to_string(), vec![]);
    session
        .messages
        .push(studyvault::types::Message::user("question"));
    session
        .messages
        .push(studyvault::types::Message::assistant("partial"));
    f.state.sessions().put(session.clone()).unwrap();

    let replaced = f
        .state
        .sessions()
        .update(&session.id, "u1", |s| {
            s.replace_last_assistant("final answer".to_string()).cloned()
        })
        .unwrap();

    assert_eq!(replaced.map(|m| m.content), Some("final answer".to_string()));
}

#[tokio::test]
async fn deleting_a_document_leaves_sessions_untouched() {
    use axum::extract::{Path, Query, State};
    use axum::Json;
    use studyvault::server::routes::files;
    use studyvault::types::query::OwnerQuery;

    let f = fixture();
    let doc = f
        .state
        .pipeline()
        .ingest(
            "u1",
            None,
            None,
            txt_upload("france.txt", "The capital of France is Paris."),
        )
        .await
        .unwrap();

    let session = Session::new("u1".to_string(), vec![doc.id]);
    f.state.sessions().put(session.clone()).unwrap();

    let Json(response) = files::delete_file(
        State(f.state.clone()),
        Path(doc.id),
        Query(OwnerQuery {
            owner_id: "u1".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(response.vectors_deleted, 1);

    // The session keeps its stale reference; it simply retrieves nothing now
    let stored = f.state.sessions().get(&session.id, "u1").unwrap();
    assert_eq!(stored.source_documents, vec![doc.id]);

    let filter = ChunkFilter::for_owner("u1").with_documents(vec![doc.id]);
    let context = f.state.assembler().assemble("capital", &filter).await.unwrap();
    assert!(context.is_empty());
}

#[tokio::test]
async fn state_starts_unready_until_marked() {
    let f = fixture();
    assert!(!f.state.is_ready());
    f.state.set_ready(true);
    assert!(f.state.is_ready());
}
