use thiserror::Error;

/// Fatal failures of a document generation call.
///
/// Empty drafts and oversized blocks are degradations, not errors: they are
/// logged and still produce a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("background template unavailable: {0}")]
    TemplateUnavailable(String),

    #[error("background template could not be decoded: {0}")]
    TemplateDecode(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("render task failed: {0}")]
    Internal(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::TemplateDecode(e.to_string())
    }
}
