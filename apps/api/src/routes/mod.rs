pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::drafting::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Documents API
        .route("/api/v1/documents/render", post(handlers::handle_render))
        .route("/api/v1/documents/draft", post(handlers::handle_draft))
        .route("/api/v1/documents/:id", get(handlers::handle_get_document))
        .route(
            "/api/v1/documents/:id/download",
            get(handlers::handle_download),
        )
        .route(
            "/api/v1/documents/:id/preview",
            post(handlers::handle_create_preview),
        )
        // Preview handles
        .route(
            "/api/v1/previews/:token",
            get(handlers::handle_get_preview).delete(handlers::handle_revoke_preview),
        )
        // LLM usage
        .route("/api/v1/llm/stats", get(handlers::handle_llm_stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use bytes::Bytes;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::layout::default_layout_config;
    use crate::llm_client::LlmClient;
    use crate::render::template::BackgroundTemplate;
    use crate::render::{PreviewStore, RenderError, TemplateProvider};

    struct UnreachableTemplate;

    #[async_trait]
    impl TemplateProvider for UnreachableTemplate {
        async fn fetch(&self) -> Result<BackgroundTemplate, RenderError> {
            Err(RenderError::TemplateUnavailable("bucket offline".into()))
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/contracts_test".into(),
            s3_bucket: "contracts".into(),
            s3_endpoint: "http://localhost:9000".into(),
            aws_access_key_id: "test".into(),
            aws_secret_access_key: "test".into(),
            anthropic_api_key: "test".into(),
            port: 0,
            rust_log: "debug".into(),
            template_s3_key: "templates/letterhead.png".into(),
            template_path: None,
            llm_min_interval: Duration::ZERO,
            preview_ttl: Duration::from_secs(60),
        }
    }

    fn test_state() -> AppState {
        let config = test_config();
        AppState {
            // Never connects: the routes under test fail or finish before touching the DB.
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            llm: LlmClient::new(config.anthropic_api_key.clone(), Duration::ZERO).unwrap(),
            templates: Arc::new(UnreachableTemplate),
            layout: default_layout_config(),
            previews: PreviewStore::new(chrono::Duration::seconds(60)),
            config,
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let response = app
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["service"], "contracts-api");
        assert_eq!(json["template_source"], "s3");
    }

    #[tokio::test]
    async fn test_render_with_unreachable_template_is_503() {
        let app = build_router(test_state());
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/documents/render",
                Some(serde_json::json!({
                    "text": "SERVICE AGREEMENT\n1. SCOPE OF SERVICES\nThe Provider shall deliver.",
                    "title": "Service Agreement",
                    "document_type": "Service Agreement"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "TEMPLATE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_draft_requires_document_type() {
        let state = test_state();
        let llm = state.llm.clone();
        let app = build_router(state);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/documents/draft",
                Some(serde_json::json!({ "document_type": "  ", "title": "Lease" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // Rejected before any LLM call.
        assert_eq!(llm.stats().snapshot().total_calls, 0);
    }

    #[tokio::test]
    async fn test_preview_lifecycle() {
        let state = test_state();
        let handle = state
            .previews
            .issue("Lease.pdf".into(), Bytes::from_static(b"%PDF-1.5"))
            .await;
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(request(Method::GET, &handle.url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"Lease.pdf\""
        );

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &handle.url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request(Method::GET, &handle.url, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_llm_stats_snapshot() {
        let app = build_router(test_state());
        let response = app
            .oneshot(request(Method::GET, "/api/v1/llm/stats", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["total_calls"], 0);
        assert_eq!(json["min_interval_ms"], 0);
    }
}
