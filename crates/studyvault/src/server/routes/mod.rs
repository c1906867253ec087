//! API routes for the vault server

pub mod chat;
pub mod files;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // File management - upload gets a larger body limit
        .route(
            "/files",
            post(files::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/files", get(files::list_files))
        .route("/files/:id", delete(files::delete_file))
        // Drive search
        .route("/search", post(files::search_files))
        // Sessions
        .route("/sessions", post(sessions::create_session))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/:id", get(sessions::get_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        .route("/sessions/:id/name", patch(sessions::rename_session))
        .route("/sessions/:id/pin", patch(sessions::pin_session))
        .route("/sessions/:id/sources", patch(sessions::add_sources))
        // Chat
        .route("/chat", post(chat::send_message))
        .route("/chat/last", patch(chat::replace_last_message))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "studyvault",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document vault with AI-assisted study sessions",
        "endpoints": {
            "POST /api/files": "Upload a document (multipart)",
            "GET /api/files": "List a user's documents",
            "DELETE /api/files/:id": "Delete a document and its vectors",
            "POST /api/search": "Semantic search across a user's documents",
            "POST /api/sessions": "Create a study session from documents",
            "GET /api/sessions": "List a user's sessions",
            "GET /api/sessions/:id": "Get one session",
            "PATCH /api/sessions/:id/name": "Rename a session",
            "PATCH /api/sessions/:id/pin": "Pin or unpin a session",
            "PATCH /api/sessions/:id/sources": "Add source documents to a session",
            "DELETE /api/sessions/:id": "Delete a session",
            "POST /api/chat": "Send a message in a session",
            "PATCH /api/chat/last": "Replace the last assistant message"
        }
    }))
}
