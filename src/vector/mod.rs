//! Vector index boundary.
//!
//! One capability interface, [`VectorIndex`], implemented once against a
//! pinned Qdrant REST API. Callers never probe for alternative client
//! methods; tests substitute an in-memory implementation.

mod qdrant;

pub use qdrant::QdrantIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// Name of the Qdrant collection holding the book chunks.
pub const COLLECTION_NAME: &str = "embodied_ai_book";

/// Payload stored alongside each vector.
///
/// Bulk-ingested chunks carry `source_file`/`chunk_index`; documents added
/// through the API may carry an `anchor` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

/// A vector plus payload, ready for upsert.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// One similarity-search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: Option<ChunkPayload>,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if it does not exist. Safe to call repeatedly.
    async fn ensure_collection(&self) -> Result<(), ApiError>;

    /// Insert or replace the given points.
    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<(), ApiError>;

    /// Top-`limit` cosine-similarity search, best first.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, ApiError>;
}
