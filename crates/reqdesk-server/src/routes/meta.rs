use axum::extract::State;
use axum::Json;
use reqdesk_core::questions::questions;

use crate::state::AppState;

/// GET /api/health
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "products": app.classifier.catalog().len(),
    }))
}

/// GET /api/questions — the fixed clarification questions, in order.
pub async fn list_questions() -> Json<serde_json::Value> {
    Json(serde_json::json!(questions()))
}

/// GET /api/catalog — product entries in tie-break order.
pub async fn get_catalog(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!(app.classifier.catalog()))
}
