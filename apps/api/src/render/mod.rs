// Rendering: background templates, page drawing, PDF assembly, previews.
// Runs strictly after pagination; see `pipeline` for the call sequence.

pub mod document;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod preview;
pub mod template;

pub use document::{DownloadArtifact, GeneratedDocument};
pub use error::RenderError;
pub use pipeline::{generate_document, GenerateDocumentRequest};
pub use preview::{PreviewHandle, PreviewStore};
pub use template::{FileTemplateProvider, S3TemplateProvider, TemplateProvider};
