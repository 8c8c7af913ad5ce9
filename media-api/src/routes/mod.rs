//! Route registration

pub mod media;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::state::AppState;

/// Creates the router with all handler routes
#[must_use]
pub fn handler() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/media/presigned-url", get(media::presigned_upload_url))
        .route("/api/media/upload", post(media::upload))
        .route("/api/media/objects", get(media::list_objects))
        .route(
            "/api/media/objects/{*key}",
            get(media::download_url).delete(media::delete_object),
        )
        .fallback(not_found)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}
