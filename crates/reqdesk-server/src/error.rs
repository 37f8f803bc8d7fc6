use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqdesk_core::ReqdeskError;

pub const ANALYZE_FAILED: &str = "request processing failed";
pub const GENERATE_FAILED: &str = "document generation failed";
pub const WEBHOOK_FAILED: &str = "webhook processing failed";

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Handlers attach a context string
/// naming the failed operation; the body carries the whole chain.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ReqdeskError>() {
            Some(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        } else {
            tracing::warn!(error = %format!("{:#}", self.0), "rejected request");
        }

        let body = serde_json::json!({ "error": format!("{:#}", self.0) });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Classify a JSON extractor rejection: a well-formed body of the wrong shape
/// is invalid input, anything else is a malformed payload.
pub fn from_json_rejection(rejection: JsonRejection) -> ReqdeskError {
    match rejection {
        JsonRejection::JsonDataError(e) => ReqdeskError::InvalidInput(e.body_text()),
        other => ReqdeskError::MalformedPayload(other.body_text()),
    }
}
