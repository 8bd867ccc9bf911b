//! Router configuration for the board API.

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_reply, create_thread, delete_reply, delete_thread, get_thread, list_threads,
    report_reply, report_thread, AppState,
};
use super::middleware::create_cors_layer;
use crate::config::WebConfig;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let thread_routes = Router::new().route(
        "/:board",
        get(list_threads)
            .post(create_thread)
            .put(report_thread)
            .delete(delete_thread),
    );

    let reply_routes = Router::new().route(
        "/:board",
        get(get_thread)
            .post(create_reply)
            .put(report_reply)
            .delete(delete_reply),
    );

    let api_routes = Router::new()
        .nest("/threads", thread_routes)
        .nest("/replies", reply_routes);

    Router::new()
        .nest("/api", api_routes)
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

/// Create the router serving the board pages.
///
/// `/b/:board/` serves `board.html` and `/b/:board/:thread_id/` serves
/// `thread.html`; anything else is looked up in the directory. Returns
/// `None` if `static_path` is not a directory.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }

    let board_page = ServeFile::new(dir.join("board.html"));
    let thread_page = ServeFile::new(dir.join("thread.html"));

    Some(
        Router::new()
            .route_service("/b/:board", board_page.clone())
            .route_service("/b/:board/", board_page)
            .route_service("/b/:board/:thread_id", thread_page.clone())
            .route_service("/b/:board/:thread_id/", thread_page)
            .fallback_service(ServeDir::new(dir)),
    )
}

/// Build the complete application: API, health check and, if enabled, the
/// board pages, all behind gzip compression.
pub fn create_app(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let mut router = create_router(app_state, &config.cors_origins).merge(create_health_router());

    if config.serve_static {
        if let Some(static_router) = create_static_router(&config.static_path) {
            router = router.merge(static_router);
        }
    }

    router.layer(CompressionLayer::new())
}
