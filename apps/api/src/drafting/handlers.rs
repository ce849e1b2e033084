//! Axum route handlers for the Documents API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drafting::generator::{draft_contract, DraftRequest};
use crate::drafting::store::{decode_pdf, get_document, insert_document};
use crate::errors::AppError;
use crate::llm_client::LlmStatsSnapshot;
use crate::models::document::DocumentSummary;
use crate::render::{generate_document, DownloadArtifact, GenerateDocumentRequest, PreviewHandle};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_type: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub document: DocumentSummary,
    pub preview: PreviewHandle,
    pub truncated_pages: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub document: DocumentSummary,
    pub preview: PreviewHandle,
    pub truncated_pages: Vec<usize>,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared flow
// ────────────────────────────────────────────────────────────────────────────

/// Generate → persist → issue a preview handle.
async fn render_and_store(
    state: &AppState,
    text: String,
    title: String,
    document_type: String,
) -> Result<RenderResponse, AppError> {
    let request = GenerateDocumentRequest {
        text,
        title,
        document_type_label: document_type,
    };
    let source_text = request.text.clone();
    let document_type = request.document_type_label.clone();

    let generated = generate_document(request, state.templates.as_ref(), &state.layout).await?;
    let row = insert_document(&state.db, &generated, &document_type, &source_text).await?;
    let preview = state
        .previews
        .issue(generated.filename.clone(), generated.bytes.clone())
        .await;

    Ok(RenderResponse {
        document: DocumentSummary::from(&row),
        preview,
        truncated_pages: generated.truncated_pages,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/render
///
/// Lays out caller-supplied text on the letterhead and stores the PDF.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<(StatusCode, Json<RenderResponse>), AppError> {
    let response =
        render_and_store(&state, request.text, request.title, request.document_type).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/documents/draft
///
/// Drafts a contract with the LLM, then renders and stores it like `/render`.
pub async fn handle_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<(StatusCode, Json<DraftResponse>), AppError> {
    let text = draft_contract(&state.llm, &request).await?;

    let rendered = render_and_store(
        &state,
        text.clone(),
        request.title.clone(),
        request.document_type.clone(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DraftResponse {
            document: rendered.document,
            preview: rendered.preview,
            truncated_pages: rendered.truncated_pages,
            text,
        }),
    ))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentSummary>, AppError> {
    let row = get_document(&state.db, id).await?;
    Ok(Json(DocumentSummary::from(&row)))
}

/// GET /api/v1/documents/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<DownloadArtifact, AppError> {
    let row = get_document(&state.db, id).await?;
    let bytes = decode_pdf(&row)?;
    Ok(DownloadArtifact::attachment(row.filename, bytes))
}

/// POST /api/v1/documents/:id/preview
///
/// Issues a fresh inline-preview handle for a stored document.
pub async fn handle_create_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<PreviewHandle>), AppError> {
    let row = get_document(&state.db, id).await?;
    let bytes = decode_pdf(&row)?;
    let handle = state.previews.issue(row.filename, bytes).await;
    Ok((StatusCode::CREATED, Json(handle)))
}

/// GET /api/v1/previews/:token
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<DownloadArtifact, AppError> {
    let (filename, bytes) = state
        .previews
        .get(token)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Preview {token} not found or expired")))?;
    Ok(DownloadArtifact::inline(filename, bytes))
}

/// DELETE /api/v1/previews/:token
pub async fn handle_revoke_preview(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.previews.revoke(token).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Preview {token} not found")))
    }
}

/// GET /api/v1/llm/stats
pub async fn handle_llm_stats(State(state): State<AppState>) -> Json<LlmStatsSnapshot> {
    Json(state.llm.stats().snapshot())
}
