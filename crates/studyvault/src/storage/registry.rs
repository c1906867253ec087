//! JSON-file-backed metadata registries
//!
//! Records live in a concurrent map and are flushed to a pretty-printed
//! JSON file on every mutation. Unlike logging or summaries, a failed flush
//! is a real error: a record the client believes exists must survive a
//! restart.

use dashmap::DashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Document, Session};

/// Persistent registry of document records
pub struct DocumentRegistry {
    documents: DashMap<Uuid, Document>,
    path: PathBuf,
}

impl DocumentRegistry {
    /// Open a registry, loading any previously persisted records
    pub fn open(path: PathBuf) -> Self {
        let documents = DashMap::new();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<Vec<Document>>(&content) {
                    Ok(docs) => {
                        for doc in docs {
                            documents.insert(doc.id, doc);
                        }
                    }
                    Err(e) => tracing::warn!("Failed to parse {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} documents from registry", documents.len());
        Self { documents, path }
    }

    fn save(&self) -> Result<()> {
        let docs: Vec<Document> = self.documents.iter().map(|e| e.value().clone()).collect();
        let content = serde_json::to_string_pretty(&docs)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::internal(format!("Failed to persist document registry: {}", e)))
    }

    /// Insert or replace a document record (flushed to disk)
    pub fn put(&self, doc: Document) -> Result<()> {
        self.documents.insert(doc.id, doc);
        self.save()
    }

    /// Get a document, scoped to its owner
    pub fn get(&self, id: &Uuid, owner_id: &str) -> Option<Document> {
        self.documents
            .get(id)
            .filter(|d| d.owner_id == owner_id)
            .map(|d| d.clone())
    }

    /// Remove a document, scoped to its owner (flushed to disk)
    pub fn remove(&self, id: &Uuid, owner_id: &str) -> Result<Option<Document>> {
        let matches_owner = self
            .documents
            .get(id)
            .map(|d| d.owner_id == owner_id)
            .unwrap_or(false);
        if !matches_owner {
            return Ok(None);
        }

        let removed = self.documents.remove(id).map(|(_, d)| d);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// List an owner's documents, newest first
    pub fn list_for_owner(&self, owner_id: &str) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .filter(|e| e.value().owner_id == owner_id)
            .map(|e| e.value().clone())
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        docs
    }

    /// Find an owner's document with matching content hash
    pub fn find_by_hash(&self, owner_id: &str, content_hash: &str) -> Option<Document> {
        self.documents
            .iter()
            .find(|e| {
                let d = e.value();
                d.owner_id == owner_id && !d.content_hash.is_empty() && d.content_hash == content_hash
            })
            .map(|e| e.value().clone())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Persistent registry of study sessions
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Session>,
    path: PathBuf,
}

impl SessionRegistry {
    /// Open a registry, loading any previously persisted sessions
    pub fn open(path: PathBuf) -> Self {
        let sessions = DashMap::new();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<Vec<Session>>(&content) {
                    Ok(loaded) => {
                        for session in loaded {
                            sessions.insert(session.id, session);
                        }
                    }
                    Err(e) => tracing::warn!("Failed to parse {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} sessions from registry", sessions.len());
        Self { sessions, path }
    }

    fn save(&self) -> Result<()> {
        let all: Vec<Session> = self.sessions.iter().map(|e| e.value().clone()).collect();
        let content = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::internal(format!("Failed to persist session registry: {}", e)))
    }

    /// Insert or replace a session (flushed to disk)
    pub fn put(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.id, session);
        self.save()
    }

    /// Get a session, scoped to its owner
    pub fn get(&self, id: &Uuid, owner_id: &str) -> Option<Session> {
        self.sessions
            .get(id)
            .filter(|s| s.owner_id == owner_id)
            .map(|s| s.clone())
    }

    /// Mutate a session in place and persist it.
    ///
    /// Returns `SessionNotFound` when the id does not exist for this owner.
    pub fn update<T>(
        &self,
        id: &Uuid,
        owner_id: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T> {
        let result = {
            let mut entry = self
                .sessions
                .get_mut(id)
                .filter(|s| s.owner_id == owner_id)
                .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
            let session = entry.value_mut();
            session.last_active = chrono::Utc::now();
            f(session)
        };
        self.save()?;
        Ok(result)
    }

    /// Remove a session, scoped to its owner (flushed to disk)
    pub fn remove(&self, id: &Uuid, owner_id: &str) -> Result<Option<Session>> {
        let matches_owner = self
            .sessions
            .get(id)
            .map(|s| s.owner_id == owner_id)
            .unwrap_or(false);
        if !matches_owner {
            return Ok(None);
        }

        let removed = self.sessions.remove(id).map(|(_, s)| s);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// List an owner's sessions, most recently active first
    pub fn list_for_owner(&self, owner_id: &str) -> Vec<Session> {
        let mut all: Vec<Session> = self
            .sessions
            .iter()
            .filter(|e| e.value().owner_id == owner_id)
            .map(|e| e.value().clone())
            .collect();
        all.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        all
    }
}
