//! Qdrant REST implementation of [`VectorIndex`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::embedding::EMBEDDING_DIM;

use super::{ChunkPayload, IndexPoint, ScoredPoint, VectorIndex};

pub struct QdrantIndex {
    base_url: String,
    api_key: Option<String>,
    collection: String,
    client: Client,
}

impl QdrantIndex {
    pub fn new(base_url: String, api_key: Option<String>, collection: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            collection,
            client: Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<RawScoredPoint>,
}

#[derive(Deserialize)]
struct RawScoredPoint {
    id: Value,
    score: f32,
    payload: Option<ChunkPayload>,
}

/// Qdrant point ids may be UUID strings or integers on the wire.
fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self) -> Result<(), ApiError> {
        let res = self
            .with_auth(self.client.get(self.collection_url()))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if res.status().is_success() {
            return Ok(());
        }
        if res.status().as_u16() != 404 {
            return Err(ApiError::Upstream(format!(
                "qdrant collection check failed: {}",
                res.status()
            )));
        }

        let body = json!({
            "vectors": {
                "size": EMBEDDING_DIM,
                "distance": "Cosine",
            }
        });
        let res = self
            .with_auth(self.client.put(self.collection_url()))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        // 409: another process created it between the check and the put.
        if res.status().is_success() || res.status().as_u16() == 409 {
            tracing::info!("Created Qdrant collection: {}", self.collection);
            Ok(())
        } else {
            let text = res.text().await.unwrap_or_default();
            Err(ApiError::Upstream(format!(
                "qdrant collection create failed: {}",
                text
            )))
        }
    }

    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<(), ApiError> {
        if points.is_empty() {
            return Ok(());
        }

        let url = format!("{}/points?wait=true", self.collection_url());
        let body = json!({ "points": points });

        let res = self
            .with_auth(self.client.put(&url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!("qdrant upsert failed: {}", text)));
        }

        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, ApiError> {
        let url = format!("{}/points/search", self.collection_url());
        let body = json!({
            "vector": vector,
            "limit": limit.max(1),
            "with_payload": true,
        });

        let res = self
            .with_auth(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!("qdrant search failed: {}", text)));
        }

        let payload: SearchResponse = res.json().await.map_err(ApiError::upstream)?;

        Ok(payload
            .result
            .into_iter()
            .map(|raw| ScoredPoint {
                id: id_to_string(&raw.id),
                score: raw.score,
                payload: raw.payload,
            })
            .collect())
    }
}
