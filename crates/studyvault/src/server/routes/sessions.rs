//! Study session management

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::query::{
    AddSourcesRequest, CreateSessionRequest, OwnerQuery, PinRequest, RenameRequest,
};
use crate::types::Session;

/// Create a session over a set of documents.
///
/// The title and welcome summary are generated once, here. They are never
/// regenerated, not even when sources are added later.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<Session>> {
    if request.file_ids.is_empty() {
        return Err(Error::InvalidRequest(
            "A session needs at least one source document".to_string(),
        ));
    }

    let mut summaries = Vec::new();
    let mut source_ids = Vec::new();
    for id in &request.file_ids {
        let doc = state
            .documents()
            .get(id, &request.owner_id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        if let Some(summary) = doc.summary {
            summaries.push(summary);
        }
        source_ids.push(doc.id);
    }

    let intro = state
        .composer()
        .compose_session_intro(&summaries.join("\n\n"))
        .await;

    let mut session = Session::new(request.owner_id, source_ids);
    session.name = intro.title.clone();
    session.ai_title = intro.title;
    session.ai_summary = intro.summary;

    state.sessions().put(session.clone())?;
    tracing::info!(session = %session.id, "Session created");
    Ok(Json(session))
}

/// List a user's sessions, most recently active first
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Json<Vec<Session>> {
    Json(state.sessions().list_for_owner(&query.owner_id))
}

/// Get one session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Session>> {
    state
        .sessions()
        .get(&id, &query.owner_id)
        .map(Json)
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))
}

/// Rename a session
pub async fn rename_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<Session>> {
    let session = state.sessions().update(&id, &request.owner_id, |s| {
        s.name = request.name.clone();
        s.clone()
    })?;
    Ok(Json(session))
}

/// Pin or unpin a session
pub async fn pin_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PinRequest>,
) -> Result<Json<Session>> {
    let session = state.sessions().update(&id, &request.owner_id, |s| {
        s.pinned = request.pinned;
        s.clone()
    })?;
    Ok(Json(session))
}

/// Add source documents to a session.
///
/// Idempotent: ids already attached are skipped, and nothing is
/// re-summarized or re-titled.
pub async fn add_sources(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddSourcesRequest>,
) -> Result<Json<Session>> {
    // Only attach documents that exist and belong to this owner
    let mut valid = Vec::new();
    for file_id in &request.file_ids {
        if state.documents().get(file_id, &request.owner_id).is_some() {
            valid.push(*file_id);
        } else {
            tracing::warn!(document = %file_id, "Skipping unknown source document");
        }
    }

    let session = state.sessions().update(&id, &request.owner_id, |s| {
        let added = s.add_sources(&valid);
        tracing::info!(session = %s.id, added, "Sources updated");
        s.clone()
    })?;
    Ok(Json(session))
}

/// Delete a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<serde_json::Value>> {
    let removed = state.sessions().remove(&id, &query.owner_id)?;
    if removed.is_none() {
        return Err(Error::SessionNotFound(id.to_string()));
    }
    Ok(Json(serde_json::json!({ "deleted": id })))
}
