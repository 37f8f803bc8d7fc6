use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use reqdesk_core::document::GenerateRequest;

use crate::error::{from_json_rejection, AppError, GENERATE_FAILED};
use crate::state::AppState;

/// POST /api/generate-requirement — allocate an id and render the document.
pub async fn generate_requirement(
    State(app): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = body.map_err(from_json_rejection).context(GENERATE_FAILED)?;
    // Reject before allocating so a bad request never consumes a sequence number.
    req.validate().context(GENERATE_FAILED)?;

    let today = app.today();
    let id = app.ids.next(today).to_string();
    let doc = app
        .synthesizer
        .synthesize_request(&id, req, today)
        .context(GENERATE_FAILED)?;

    tracing::info!(id = %doc.id, product = %doc.product, "generated requirement document");

    Ok(Json(serde_json::json!({
        "id": doc.id,
        "content": doc.content,
        "message": format!("要件定義書 {} を作成しました", doc.id),
        "product": doc.product,
        "createdAt": doc.created_at,
        "status": doc.status,
    })))
}
