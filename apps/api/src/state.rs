use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::layout::LayoutConfig;
use crate::llm_client::LlmClient;
use crate::render::{PreviewStore, TemplateProvider};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Owns the LLM call statistics and rate gate; clones share them.
    pub llm: LlmClient,
    pub config: Config,
    /// Letterhead source. S3 by default, a local file when TEMPLATE_PATH is set.
    pub templates: Arc<dyn TemplateProvider>,
    /// Page geometry and typography for every generated document.
    pub layout: LayoutConfig,
    pub previews: PreviewStore,
}
