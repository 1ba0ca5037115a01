use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::state::AppState;
use crate::vector::{ChunkPayload, IndexPoint};

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub id: String,
    pub module: String,
    pub chapter: String,
    #[serde(default)]
    pub anchor: Option<String>,
    pub text: String,
}

pub async fn add_document(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let embedder = state.require_embedder()?;
    let index = state.require_index()?;

    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let inputs = [payload.text.clone()];
    let vectors = embedder.embed(&inputs).await?;
    let vector = vectors
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("embedder returned no vector".to_string()))?;

    let qdrant_id = Uuid::new_v4().to_string();
    let point = IndexPoint {
        id: qdrant_id.clone(),
        vector,
        payload: ChunkPayload {
            id: payload.id,
            module: payload.module,
            chapter: payload.chapter,
            text: payload.text,
            anchor: payload.anchor,
            source_file: None,
            chunk_index: None,
        },
    };

    index.upsert(vec![point]).await?;

    Ok(Json(json!({
        "message": "Document added successfully",
        "qdrant_id": qdrant_id,
    })))
}
