use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored PDF. `pdf_base64` stays server-side; handlers return `DocumentSummary`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub title: String,
    pub document_type: String,
    pub filename: String,
    pub page_count: i32,
    pub source_text: String,
    #[serde(skip_serializing)]
    pub pdf_base64: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    pub document_type: String,
    pub filename: String,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&DocumentRow> for DocumentSummary {
    fn from(row: &DocumentRow) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            document_type: row.document_type.clone(),
            filename: row.filename.clone(),
            page_count: row.page_count,
            created_at: row.created_at,
        }
    }
}
