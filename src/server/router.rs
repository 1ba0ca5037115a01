use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, documents, embed, health, retrieve};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// CORS is wide open: the reader frontend is served from arbitrary
/// origins (local dev servers, the published book site).
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route("/embed", post(embed::embed_text))
        .route("/retrieve", post(retrieve::retrieve))
        .route("/add_document", post(documents::add_document))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
