//! Embedding provider boundary.
//!
//! The index and the chat flow only see the [`Embedder`] trait; the
//! production implementation speaks to an OpenAI-compatible
//! `/v1/embeddings` endpoint over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::ApiError;

/// Dimensionality the vector index is created with; every embedding
/// returned to callers must have exactly this length.
pub const EMBEDDING_DIM: usize = 384;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input text into a fixed-length vector, one per input,
    /// in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}

/// HTTP embedder against an OpenAI-compatible `/v1/embeddings` endpoint.
#[derive(Clone)]
pub struct HttpEmbedder {
    base_url: String,
    model: String,
    client: Client,
}

impl HttpEmbedder {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!("embedding error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::upstream)?;

        let mut embeddings = Vec::new();
        if let Some(data) = payload["data"].as_array() {
            for item in data {
                if let Some(vals) = item["embedding"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(ApiError::Internal(format!(
                "embedding service returned {} vectors for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }
        for vec in &embeddings {
            if vec.len() != EMBEDDING_DIM {
                return Err(ApiError::Internal(format!(
                    "embedding dimension {} does not match index dimension {}",
                    vec.len(),
                    EMBEDDING_DIM
                )));
            }
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn decodes_embedding_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/embeddings")
                .json_body_partial(r#"{"model": "bge-small-en-v1.5"}"#);
            then.status(200).json_body(serde_json::json!({
                "data": [
                    { "embedding": vec![0.25_f32; EMBEDDING_DIM] }
                ]
            }));
        });

        let embedder = HttpEmbedder::new(server.base_url(), "bge-small-en-v1.5".to_string());
        let vectors = embedder
            .embed(&["hello world".to_string()])
            .await
            .expect("embed should succeed");

        mock.assert();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].len(), EMBEDDING_DIM);
        assert!((vectors[0][0] - 0.25).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn rejects_wrong_dimensionality() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200).json_body(serde_json::json!({
                "data": [ { "embedding": [0.1, 0.2, 0.3] } ]
            }));
        });

        let embedder = HttpEmbedder::new(server.base_url(), "bge-small-en-v1.5".to_string());
        let result = embedder.embed(&["hello".to_string()]).await;
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn surfaces_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(500).body("boom");
        });

        let embedder = HttpEmbedder::new(server.base_url(), "bge-small-en-v1.5".to_string());
        let result = embedder.embed(&["hello".to_string()]).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }
}
