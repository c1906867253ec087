//! Request payload types

use serde::Deserialize;
use uuid::Uuid;

/// Owner scoping for list/get/delete endpoints
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: String,
}

/// Free-text search over a user's documents
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub owner_id: String,
    pub query: String,
}

/// Create a new study session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub owner_id: String,
    pub file_ids: Vec<Uuid>,
}

/// Rename a session
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub owner_id: String,
    pub name: String,
}

/// Pin or unpin a session
#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub owner_id: String,
    pub pinned: bool,
}

/// Add source documents to a session
#[derive(Debug, Deserialize)]
pub struct AddSourcesRequest {
    pub owner_id: String,
    pub file_ids: Vec<Uuid>,
}

/// Send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub owner_id: String,
    pub message: String,
    /// Response style instruction, defaults to a concise two-sentence answer
    #[serde(default)]
    pub style_instruction: Option<String>,
}

/// Replace the last assistant message (interrupted streaming recovery)
#[derive(Debug, Deserialize)]
pub struct ReplaceLastRequest {
    pub session_id: Uuid,
    pub owner_id: String,
    pub content: String,
}
