//! Session chat endpoints

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::retrieval::ChunkFilter;
use crate::server::state::AppState;
use crate::types::query::{ChatRequest, ReplaceLastRequest};
use crate::types::response::ChatResponse;
use crate::types::Message;

/// Send a message in a session and get a grounded reply.
///
/// Generation failures still produce a reply (the quota wait message), so
/// this only errors when the session is missing or retrieval itself breaks.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let started = Instant::now();

    let session = state
        .sessions()
        .get(&request.session_id, &request.owner_id)
        .ok_or_else(|| Error::SessionNotFound(request.session_id.to_string()))?;

    let filter = ChunkFilter::for_owner(&request.owner_id)
        .with_documents(session.source_documents.clone());
    let context = state.assembler().assemble(&request.message, &filter).await?;

    tracing::info!(
        session = %session.id,
        context_chars = context.len(),
        "Context assembled"
    );

    let reply = state
        .composer()
        .compose(&request.message, &context, request.style_instruction.as_deref())
        .await;

    let assistant = Message::assistant(reply);
    state
        .sessions()
        .update(&request.session_id, &request.owner_id, |s| {
            s.messages.push(Message::user(request.message.clone()));
            s.messages.push(assistant.clone());
        })?;

    tracing::info!(
        session = %session.id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Reply generated"
    );
    Ok(Json(ChatResponse {
        session_id: request.session_id,
        message: assistant,
    }))
}

/// Replace the content of the last assistant message.
///
/// Used by the client to finalize an interrupted streamed reply. Rejected
/// when the last message is not an assistant message.
pub async fn replace_last_message(
    State(state): State<AppState>,
    Json(request): Json<ReplaceLastRequest>,
) -> Result<Json<ChatResponse>> {
    let replaced = state
        .sessions()
        .update(&request.session_id, &request.owner_id, |s| {
            s.replace_last_assistant(request.content.clone()).cloned()
        })?;

    match replaced {
        Some(message) => Ok(Json(ChatResponse {
            session_id: request.session_id,
            message,
        })),
        None => Err(Error::InvalidRequest(
            "Last message is not an assistant message".to_string(),
        )),
    }
}
