//! File upload, listing, deletion, and drive search

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::UploadedFile;
use crate::retrieval::store::meta;
use crate::retrieval::ChunkFilter;
use crate::server::state::AppState;
use crate::types::query::{OwnerQuery, SearchRequest};
use crate::types::response::{DeleteResponse, DocumentView, SearchMatch};

/// Upload a document (multipart: `file` + `owner_id`, optional `folder_id`
/// and `session_id`)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentView>> {
    let started = Instant::now();

    let mut upload: Option<UploadedFile> = None;
    let mut owner_id: Option<String> = None;
    let mut folder_id: Option<Uuid> = None;
    let mut session_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidRequest(format!("Failed to read file: {}", e)))?;
                upload = Some(UploadedFile {
                    file_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            "owner_id" => {
                owner_id = Some(field.text().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read owner_id: {}", e))
                })?);
            }
            "folder_id" => {
                let raw = field.text().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read folder_id: {}", e))
                })?;
                folder_id = Some(
                    raw.parse()
                        .map_err(|_| Error::InvalidRequest(format!("Invalid folder_id: {}", raw)))?,
                );
            }
            "session_id" => {
                let raw = field.text().await.map_err(|e| {
                    Error::InvalidRequest(format!("Failed to read session_id: {}", e))
                })?;
                session_id = Some(
                    raw.parse().map_err(|_| {
                        Error::InvalidRequest(format!("Invalid session_id: {}", raw))
                    })?,
                );
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field '{}'", other);
            }
        }
    }

    let upload = upload.ok_or_else(|| Error::InvalidRequest("Missing 'file' field".to_string()))?;
    let owner_id =
        owner_id.ok_or_else(|| Error::InvalidRequest("Missing 'owner_id' field".to_string()))?;

    tracing::info!(
        file_name = upload.file_name,
        size = upload.bytes.len(),
        "Upload received"
    );

    let doc = state
        .pipeline()
        .ingest(&owner_id, folder_id, session_id, upload)
        .await?;

    // Uploading into an open session also attaches the document to it
    if let Some(session_id) = session_id {
        state
            .sessions()
            .update(&session_id, &owner_id, |s| s.add_sources(&[doc.id]))?;
    }

    tracing::info!(
        document = %doc.id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Upload complete"
    );
    Ok(Json(DocumentView::from(&doc)))
}

/// List a user's documents
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Json<Vec<DocumentView>> {
    let views = state
        .documents()
        .list_for_owner(&query.owner_id)
        .iter()
        .map(DocumentView::from)
        .collect();
    Json(views)
}

/// Delete a document, its blobs, and its vectors
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<DeleteResponse>> {
    let doc = state
        .documents()
        .get(&id, &query.owner_id)
        .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;

    // Sessions keep any stale reference to the id; with the vectors gone it
    // simply retrieves nothing
    let vectors_deleted = state.pipeline().delete(&query.owner_id, &doc).await?;

    Ok(Json(DeleteResponse {
        id,
        vectors_deleted,
    }))
}

/// Semantic search across a user's documents
pub async fn search_files(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchMatch>>> {
    let filter = ChunkFilter::for_owner(&request.owner_id);
    let matches = state.assembler().top_matches(&request.query, &filter).await?;

    // One result per document, best-scoring chunk wins
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut results = Vec::new();
    for m in matches {
        let Some(document_id) = m
            .metadata_str(meta::DOCUMENT_ID)
            .and_then(|s| s.parse::<Uuid>().ok())
        else {
            continue;
        };
        if !seen.insert(document_id) {
            continue;
        }

        let file_name = m.metadata_str(meta::FILE_NAME).unwrap_or("").to_string();
        let snippet: String = m
            .metadata_str(meta::TEXT)
            .unwrap_or("")
            .chars()
            .take(200)
            .collect();

        results.push(SearchMatch {
            document_id,
            file_name,
            snippet,
            score: m.score,
        });
    }

    Ok(Json(results))
}
