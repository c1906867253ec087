//! Study session types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// A study session grounded in a set of source documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,
    /// Owning user
    pub owner_id: String,
    /// User-facing name (renameable)
    pub name: String,
    /// Documents this session draws answers from
    pub source_documents: Vec<Uuid>,
    /// AI-generated title (set once at creation)
    pub ai_title: String,
    /// AI-generated opening summary (set once at creation)
    pub ai_summary: String,
    /// Conversation history
    pub messages: Vec<Message>,
    /// Pinned in the UI list
    #[serde(default)]
    pub pinned: bool,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last activity timestamp
    pub last_active: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// Create a new session for a set of documents
    pub fn new(owner_id: String, source_documents: Vec<Uuid>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: "New Session".to_string(),
            source_documents,
            ai_title: String::new(),
            ai_summary: String::new(),
            messages: Vec::new(),
            pinned: false,
            created_at: now,
            last_active: now,
        }
    }

    /// Add source documents, skipping ids already present
    ///
    /// Returns the number of documents actually added.
    pub fn add_sources(&mut self, ids: &[Uuid]) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.source_documents.contains(id) {
                self.source_documents.push(*id);
                added += 1;
            }
        }
        added
    }

    /// Replace the content of the last message, only if it is an assistant message
    pub fn replace_last_assistant(&mut self, content: String) -> Option<&Message> {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content = content;
                last.timestamp = chrono::Utc::now();
                self.messages.last()
            }
            _ => None,
        }
    }
}
