use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and letterhead source.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let template_source = if state.config.template_path.is_some() {
        "file"
    } else {
        "s3"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "contracts-api",
        "template_source": template_source
    }))
}
