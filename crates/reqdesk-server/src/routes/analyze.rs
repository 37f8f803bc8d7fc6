use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use reqdesk_core::questions::{analysis_message, questions};
use reqdesk_core::ReqdeskError;

use crate::error::{from_json_rejection, AppError, ANALYZE_FAILED};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub request: Option<String>,
}

/// POST /api/analyze — classify a request and return the follow-up questions.
pub async fn analyze(
    State(app): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body.map_err(from_json_rejection).context(ANALYZE_FAILED)?;
    let request = body
        .request
        .ok_or_else(|| ReqdeskError::InvalidInput("missing field `request`".to_string()))
        .context(ANALYZE_FAILED)?;

    tracing::info!(len = request.len(), "received request");
    let result = app.classifier.classify(&request);
    tracing::info!(
        product = %result.product,
        confidence = %result.confidence,
        matched = result.matched_keyword_count,
        "classified request"
    );

    Ok(Json(serde_json::json!({
        "message": analysis_message(&result.product),
        "request": request,
        "product": result.product,
        "productKey": result.product_key,
        "confidence": result.confidence,
        "matchedKeywordCount": result.matched_keyword_count,
        "matchedKeywords": result.matched_keywords,
        "perProductScores": result.per_product_scores,
        "questions": questions(),
    })))
}
