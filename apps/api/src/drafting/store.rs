//! Persistence for generated documents (`documents` table).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::DocumentRow;
use crate::render::GeneratedDocument;

/// Inserts a generated PDF and returns the stored row.
pub async fn insert_document(
    pool: &PgPool,
    document: &GeneratedDocument,
    document_type: &str,
    source_text: &str,
) -> Result<DocumentRow, AppError> {
    let page_count = i32::try_from(document.page_count).map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "page count {} does not fit the documents table",
            document.page_count
        ))
    })?;

    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents
            (id, title, document_type, filename, page_count, source_text, pdf_base64)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&document.title)
    .bind(document_type)
    .bind(&document.filename)
    .bind(page_count)
    .bind(source_text)
    .bind(document.to_base64())
    .fetch_one(pool)
    .await?;

    info!(
        "Stored document {} ({} pages, {})",
        row.id, row.page_count, row.filename
    );
    Ok(row)
}

pub async fn get_document(pool: &PgPool, id: Uuid) -> Result<DocumentRow, AppError> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

/// Decodes the stored PDF bytes.
pub fn decode_pdf(row: &DocumentRow) -> Result<Bytes, AppError> {
    BASE64
        .decode(&row.pdf_base64)
        .map(Bytes::from)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored PDF for {} is corrupt: {e}", row.id)))
}
