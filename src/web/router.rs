//! Router configuration for the dashboard API.

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    clear_messages, coderabbit_report, coderabbit_sync, get_report, list_messages, post_comment,
    post_message, sync_comments, AppState,
};
use super::middleware::create_cors_layer;
use super::ws::chat_ws_handler;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let chat_routes = Router::new().route(
        "/:owner/:repo/:pr",
        get(list_messages).post(post_message).delete(clear_messages),
    );

    let coderabbit_routes = Router::new()
        .route("/report", get(coderabbit_report))
        .route("/sync/:owner/:repo", post(coderabbit_sync));

    let github_routes = Router::new()
        .route("/comment/:owner/:repo/:pr", post(post_comment))
        .route("/sync/:owner/:repo/:pr", post(sync_comments));

    let api_routes = Router::new()
        .route("/report", get(get_report))
        .nest("/chat", chat_routes)
        .nest("/coderabbit", coderabbit_routes)
        .nest("/github", github_routes);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws/:owner/:repo/:pr", get(chat_ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the dashboard's static files.
///
/// Returns `None` if the directory does not exist. Unknown paths fall back
/// to `index.html`.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }

    let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));

    Some(Router::new().fallback_service(serve_dir))
}
