use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, Settings};
use crate::core::errors::ApiError;
use crate::embedding::{Embedder, HttpEmbedder};
use crate::history::ChatHistoryStore;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::vector::{QdrantIndex, VectorIndex, COLLECTION_NAME};

/// Shared application state.
///
/// Every collaborator is constructed once at startup; a missing credential
/// or unreachable backing service leaves `None` and the corresponding
/// endpoints report unavailability instead of the process crashing.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub index: Option<Arc<dyn VectorIndex>>,
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub history: Option<ChatHistoryStore>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::from_env(&paths);

        let embedder: Option<Arc<dyn Embedder>> = match &settings.embedding {
            Some(cfg) => Some(Arc::new(HttpEmbedder::new(cfg.url.clone(), cfg.model.clone()))),
            None => {
                tracing::warn!("EMBEDDING_URL not set; embedding service unavailable");
                None
            }
        };

        let index: Option<Arc<dyn VectorIndex>> = match &settings.qdrant {
            Some(cfg) => Some(Arc::new(QdrantIndex::new(
                cfg.url.clone(),
                cfg.api_key.clone(),
                COLLECTION_NAME.to_string(),
            ))),
            None => {
                tracing::warn!("QDRANT_URL not set; vector index unavailable");
                None
            }
        };

        let llm: Option<Arc<dyn LlmProvider>> = match &settings.gemini {
            Some(cfg) => Some(Arc::new(GeminiProvider::new(
                cfg.api_key.clone(),
                cfg.model.clone(),
            ))),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; LLM unavailable");
                None
            }
        };

        let history = match ChatHistoryStore::new(settings.history_db_path.clone()).await {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!("Chat history unavailable: {}", err);
                None
            }
        };

        Ok(Arc::new(AppState {
            paths,
            settings,
            embedder,
            index,
            llm,
            history,
            started_at: Utc::now(),
        }))
    }

    pub fn require_embedder(&self) -> Result<&Arc<dyn Embedder>, ApiError> {
        self.embedder
            .as_ref()
            .ok_or_else(|| ApiError::unavailable("embedding service"))
    }

    pub fn require_index(&self) -> Result<&Arc<dyn VectorIndex>, ApiError> {
        self.index
            .as_ref()
            .ok_or_else(|| ApiError::unavailable("vector index"))
    }

    pub fn require_llm(&self) -> Result<&Arc<dyn LlmProvider>, ApiError> {
        self.llm
            .as_ref()
            .ok_or_else(|| ApiError::unavailable("LLM provider"))
    }
}
