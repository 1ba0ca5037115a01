use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::llm::prompt;
use crate::state::AppState;

const MAX_QUERY_CHARS: usize = 1000;
const RETRIEVAL_LIMIT: usize = 5;
const CONTEXT_CHUNKS: usize = 3;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub use_selected_text: bool,
    #[serde(default)]
    pub selected_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub citations: Vec<String>,
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = payload.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query is required".to_string()));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Query exceeds {} characters",
            MAX_QUERY_CHARS
        )));
    }

    let preview: String = query.chars().take(50).collect();
    tracing::info!("Received query: {}...", preview);

    let selected = payload
        .selected_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let (response, citations) = if payload.use_selected_text && selected.is_some() {
        answer_from_selection(&state, &query, selected.unwrap_or_default()).await?
    } else {
        answer_from_retrieval(&state, &query).await?
    };

    if let Some(history) = &state.history {
        if let Err(err) = history
            .record(
                &query,
                &response,
                &citations,
                payload.use_selected_text,
                selected,
            )
            .await
        {
            tracing::warn!("Failed to record chat exchange: {}", err);
        }
    }

    Ok(Json(ChatResponse {
        response,
        citations,
        query,
        timestamp: Utc::now(),
    }))
}

async fn answer_from_selection(
    state: &AppState,
    query: &str,
    selected_text: &str,
) -> Result<(String, Vec<String>), ApiError> {
    let llm = state.require_llm()?;
    let prompt = prompt::selected_text_prompt(query, selected_text);
    let response = llm.generate(&prompt).await?;
    Ok((response, vec!["Selected Text Only".to_string()]))
}

async fn answer_from_retrieval(
    state: &AppState,
    query: &str,
) -> Result<(String, Vec<String>), ApiError> {
    let embedder = state.require_embedder()?;
    let index = state.require_index()?;
    let llm = state.require_llm()?;

    let inputs = [query.to_string()];
    let vectors = embedder.embed(&inputs).await?;
    let query_vector = vectors
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("embedder returned no vector".to_string()))?;

    let hits = index.search(&query_vector, RETRIEVAL_LIMIT).await?;

    let mut relevant_content = Vec::new();
    let mut citations = Vec::new();
    for hit in &hits {
        if let Some(payload) = &hit.payload {
            if payload.text.is_empty() {
                continue;
            }
            relevant_content.push(payload.text.clone());
            citations.push(format!(
                "Module: {}, Chapter: {}",
                payload.module, payload.chapter
            ));
        }
    }

    if relevant_content.is_empty() {
        // Nothing worth prompting over; answer with a fixed redirection.
        let response = format!(
            "I couldn't find relevant information in the book about '{}'. \
             Please check other chapters or ask a different question.",
            query
        );
        return Ok((response, Vec::new()));
    }

    let context = relevant_content
        .iter()
        .take(CONTEXT_CHUNKS)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = prompt::context_prompt(query, &context);
    let response = llm.generate(&prompt).await?;

    Ok((response, citations))
}
