//! Append-only persistence of chat exchanges.
//!
//! Never read by the retrieval or ingestion paths; a missing or broken
//! history database degrades persistence only.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: String,
    pub query: String,
    pub response: String,
    pub citations: Vec<String>,
    pub use_selected_text: bool,
    pub selected_text: Option<String>,
    pub created_at: String,
}

#[derive(Clone)]
pub struct ChatHistoryStore {
    pool: SqlitePool,
}

impl ChatHistoryStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, ApiError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to connect to history db: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_exchanges (
                id TEXT PRIMARY KEY,
                query TEXT NOT NULL,
                response TEXT NOT NULL,
                citations JSON,
                use_selected_text INTEGER NOT NULL DEFAULT 0,
                selected_text TEXT,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to init chat_exchanges table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exchanges_created_at ON chat_exchanges(created_at)",
        )
        .execute(&pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(Self { pool })
    }

    /// Append one exchange; returns its generated id.
    pub async fn record(
        &self,
        query: &str,
        response: &str,
        citations: &[String],
        use_selected_text: bool,
        selected_text: Option<&str>,
    ) -> Result<String, ApiError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let citations_json =
            serde_json::to_value(citations).unwrap_or_else(|_| Value::Array(Vec::new()));

        sqlx::query(
            "INSERT INTO chat_exchanges (id, query, response, citations, use_selected_text, selected_text, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(query)
        .bind(response)
        .bind(citations_json)
        .bind(use_selected_text)
        .bind(selected_text)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to record exchange: {}", e)))?;

        Ok(id)
    }

    /// Most recent exchanges, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ChatExchange>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, query, response, citations, use_selected_text, selected_text, created_at
             FROM chat_exchanges
             ORDER BY created_at DESC
             LIMIT ?",
        )
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let mut exchanges = Vec::new();
        for row in rows {
            let citations = row
                .try_get::<Option<Value>, _>("citations")
                .unwrap_or(None)
                .and_then(|value| serde_json::from_value::<Vec<String>>(value).ok())
                .unwrap_or_default();

            exchanges.push(ChatExchange {
                id: row.try_get::<String, _>("id").unwrap_or_default(),
                query: row.try_get::<String, _>("query").unwrap_or_default(),
                response: row.try_get::<String, _>("response").unwrap_or_default(),
                citations,
                use_selected_text: row.try_get::<bool, _>("use_selected_text").unwrap_or(false),
                selected_text: row
                    .try_get::<Option<String>, _>("selected_text")
                    .unwrap_or(None),
                created_at: row.try_get::<String, _>("created_at").unwrap_or_default(),
            });
        }

        Ok(exchanges)
    }

    /// Total number of recorded exchanges.
    pub async fn count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM chat_exchanges")
            .fetch_one(&self.pool)
            .await
            .map(|r| r.get(0))
            .unwrap_or(0);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, ChatHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ChatHistoryStore::new(dir.path().join("history.db"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn records_and_reads_back_exchanges() {
        let (_dir, store) = temp_store().await;

        let citations = vec!["Module: Introduction, Chapter: Overview".to_string()];
        let id = store
            .record("what is a node?", "A node is a process.", &citations, false, None)
            .await
            .unwrap();
        assert!(!id.is_empty());

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].query, "what is a node?");
        assert_eq!(recent[0].citations, citations);
        assert!(!recent[0].use_selected_text);
    }

    #[tokio::test]
    async fn selected_text_round_trips() {
        let (_dir, store) = temp_store().await;

        store
            .record(
                "summarize this",
                "Summary.",
                &["Selected Text Only".to_string()],
                true,
                Some("A node is a process."),
            )
            .await
            .unwrap();

        let recent = store.recent(1).await.unwrap();
        assert!(recent[0].use_selected_text);
        assert_eq!(recent[0].selected_text.as_deref(), Some("A node is a process."));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
