use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn retrieve(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RetrieveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let embedder = state.require_embedder()?;
    let index = state.require_index()?;

    let query = payload.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query is required".to_string()));
    }

    let limit = payload.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let inputs = [query.to_string()];
    let vectors = embedder.embed(&inputs).await?;
    let query_vector = vectors
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("embedder returned no vector".to_string()))?;

    let hits = index.search(&query_vector, limit).await?;

    let results: Vec<_> = hits
        .into_iter()
        .map(|hit| {
            let payload = hit.payload.unwrap_or_default();
            json!({
                "id": hit.id,
                "text": payload.text,
                "module": payload.module,
                "chapter": payload.chapter,
                "score": hit.score,
            })
        })
        .collect();

    Ok(Json(json!({ "results": results })))
}
