mod config;
mod db;
mod drafting;
mod errors;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::layout::default_layout_config;
use crate::llm_client::LlmClient;
use crate::render::{FileTemplateProvider, PreviewStore, S3TemplateProvider, TemplateProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Contracts API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Letterhead template: local file overrides S3
    let templates: Arc<dyn TemplateProvider> = match &config.template_path {
        Some(path) => {
            info!("Letterhead template from file {path}");
            Arc::new(FileTemplateProvider::new(path.clone()))
        }
        None => {
            let s3 = build_s3_client(&config).await;
            info!(
                "Letterhead template from s3://{}/{}",
                config.s3_bucket, config.template_s3_key
            );
            Arc::new(S3TemplateProvider::new(
                s3,
                config.s3_bucket.clone(),
                config.template_s3_key.clone(),
            ))
        }
    };

    // Initialize LLM client (owns call stats and the rate gate)
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_min_interval)?;
    info!(
        "LLM client initialized (model: {}, min interval {}ms)",
        llm_client::MODEL,
        config.llm_min_interval.as_millis()
    );

    let layout = default_layout_config();
    info!(
        "Layout: {}x{}pt, body {}pt",
        layout.page_width, layout.page_height, layout.body_font_size
    );

    let previews = PreviewStore::new(chrono::Duration::from_std(config.preview_ttl)?);

    // Build app state
    let state = AppState {
        db,
        llm,
        config: config.clone(),
        templates,
        layout,
        previews,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web app domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "contracts-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
