use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn embed_text(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmbedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let embedder = state.require_embedder()?;

    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let inputs = [text.to_string()];
    let vectors = embedder.embed(&inputs).await?;
    let embedding = vectors
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("embedder returned no vector".to_string()))?;

    Ok(Json(json!({ "embeddings": embedding })))
}
