//! Generation pipeline: fetch template → classify → paginate → render → serialize.
//!
//! The template fetch is the only await point. Everything after it is
//! CPU-bound and runs inside `tokio::task::spawn_blocking` on state built
//! fresh for the call, so concurrent generations share nothing mutable.

use serde::Deserialize;
use tracing::{info, warn};

use crate::layout::constraints::LayoutConfig;
use crate::layout::paginator::layout_document;
use crate::render::document::{sanitize_filename, serialize_document, GeneratedDocument};
use crate::render::error::RenderError;
use crate::render::page::{encode_page, layout_page};
use crate::render::template::{BackgroundTemplate, TemplateProvider};

/// Fewest body lines a page must hold for a template shape to be usable.
const MIN_TEXT_LINES: f32 = 3.0;

/// Input to one generation call. `text` is already cleaned by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDocumentRequest {
    pub text: String,
    pub title: String,
    pub document_type_label: String,
}

/// Async entry point. A template failure aborts before any layout work.
pub async fn generate_document(
    request: GenerateDocumentRequest,
    templates: &dyn TemplateProvider,
    config: &LayoutConfig,
) -> Result<GeneratedDocument, RenderError> {
    let template = templates.fetch().await?;

    let config = config.clone();
    tokio::task::spawn_blocking(move || render_document(&request, &template, &config))
        .await
        .map_err(|e| RenderError::Internal(format!("spawn_blocking failed in render: {e}")))?
}

/// Synchronous core: two strictly separated phases, pagination then rendering.
pub fn render_document(
    request: &GenerateDocumentRequest,
    template: &BackgroundTemplate,
    config: &LayoutConfig,
) -> Result<GeneratedDocument, RenderError> {
    let constraints = template.constraints(config);
    if constraints.usable_height < MIN_TEXT_LINES * config.line_height {
        return Err(RenderError::TemplateDecode(format!(
            "template {}x{}px leaves {:.1}pt for text",
            template.width_px, template.height_px, constraints.usable_height
        )));
    }

    // Phase 1: pagination, complete before any page is drawn.
    let document = layout_document(
        &request.text,
        &[request.title.as_str(), request.document_type_label.as_str()],
        constraints,
        config,
    );

    // Phase 2: rendering, read-only over the finished pages.
    let mut contents = Vec::with_capacity(document.page_count());
    let mut truncated_pages = Vec::new();
    for page in &document.pages {
        let rendered = layout_page(page, &document.constraints, config);
        if rendered.truncated {
            truncated_pages.push(rendered.number);
        }
        contents.push(encode_page(&rendered, &document.constraints));
    }
    if !truncated_pages.is_empty() {
        warn!(pages = ?truncated_pages, "Document rendered with truncated pages");
    }

    let bytes = serialize_document(&document, contents, template, &request.document_type_label)?;

    let filename_source = if request.title.trim().is_empty() {
        document.title.as_str()
    } else {
        request.title.as_str()
    };

    info!(
        title = %document.title,
        pages = document.page_count(),
        bytes = bytes.len(),
        "Document generated"
    );

    Ok(GeneratedDocument {
        bytes,
        filename: sanitize_filename(filename_source),
        page_count: document.page_count(),
        title: document.title,
        truncated_pages,
    })
}
