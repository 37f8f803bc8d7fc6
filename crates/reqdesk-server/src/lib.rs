pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::meta::health))
        .route("/api/questions", get(routes::meta::list_questions))
        .route("/api/catalog", get(routes::meta::get_catalog))
        // Classification & documents
        .route("/api/analyze", post(routes::analyze::analyze))
        .route(
            "/api/generate-requirement",
            post(routes::generate::generate_requirement),
        )
        // Task-tracker webhook
        .route("/webhook/lark", post(routes::webhook::receive_event))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(app_state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(app_state, listener).await
}

/// Serve on a pre-bound listener so the caller can read the actual port
/// first (useful when binding port 0).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    let products = app_state.classifier.catalog().len();
    let app = build_router(app_state);

    tracing::info!(products, "reqdesk server listening on http://{local}");

    axum::serve(listener, app).await?;
    Ok(())
}
