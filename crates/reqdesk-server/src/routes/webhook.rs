use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use reqdesk_core::webhook::{WebhookEvent, WebhookOutcome};
use reqdesk_core::ReqdeskError;

use crate::error::{AppError, WEBHOOK_FAILED};
use crate::state::AppState;

/// POST /webhook/lark — task-tracker event receiver.
///
/// The handshake is echoed, task creations are classified, comments are
/// acknowledged, and every other event type is acknowledged as unsupported.
pub async fn receive_event(
    State(app): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body
        .map_err(|e| ReqdeskError::MalformedPayload(e.body_text()))
        .context(WEBHOOK_FAILED)?;

    let event = WebhookEvent::parse(&body).context(WEBHOOK_FAILED)?;
    tracing::info!(event_type = event.event_type().unwrap_or("(none)"), "webhook received");

    let outcome = app.dispatcher.dispatch(event);
    match &outcome {
        WebhookOutcome::TaskClassified {
            task_id,
            classification,
            bot_message,
        } => {
            tracing::info!(
                task_id = task_id.as_deref().unwrap_or("-"),
                product = %classification.product,
                "classified new task"
            );
            tracing::debug!(%bot_message, "bot reply");
        }
        WebhookOutcome::Unsupported { event_type } => {
            tracing::info!(
                event_type = event_type.as_deref().unwrap_or("(none)"),
                "unsupported event type"
            );
        }
        WebhookOutcome::Challenge(_) | WebhookOutcome::CommentAcknowledged { .. } => {}
    }

    Ok(Json(outcome.to_response()))
}
