//! Process configuration.
//!
//! Everything is read from the environment exactly once at startup and
//! carried in [`Settings`]. A missing credential leaves its section as
//! `None`; the corresponding collaborator is then reported unavailable at
//! the call site instead of crashing the process.

use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let log_dir = data_dir.join("logs");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths { data_dir, log_dir }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("BOOKRAG_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        return PathBuf::from("data");
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir().join(".local/share").to_string_lossy().to_string()
    });
    PathBuf::from(xdg).join("bookrag")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct QdrantSettings {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub qdrant: Option<QdrantSettings>,
    pub embedding: Option<EmbeddingSettings>,
    pub gemini: Option<GeminiSettings>,
    pub history_db_path: PathBuf,
    pub port: u16,
    pub docs_dir: PathBuf,
}

impl Settings {
    /// Read settings from the environment (and `.env`, if present).
    pub fn from_env(paths: &AppPaths) -> Self {
        let _ = dotenvy::dotenv();

        let qdrant = env::var("QDRANT_URL").ok().and_then(|url| {
            let url = url.trim().to_string();
            if url.is_empty() {
                return None;
            }
            Some(QdrantSettings {
                url,
                api_key: non_empty_var("QDRANT_API_KEY"),
            })
        });

        let embedding = non_empty_var("EMBEDDING_URL").map(|url| EmbeddingSettings {
            url,
            model: non_empty_var("EMBEDDING_MODEL")
                .unwrap_or_else(|| "bge-small-en-v1.5".to_string()),
        });

        let gemini = non_empty_var("GEMINI_API_KEY").map(|api_key| GeminiSettings {
            api_key,
            model: non_empty_var("GEMINI_MODEL").unwrap_or_else(|| "gemini-pro".to_string()),
        });

        let history_db_path = env::var("HISTORY_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| paths.data_dir.join("chat_history.db"));

        let port = env::var("PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(8000);

        let docs_dir = env::var("DOCS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("docs"));

        Settings {
            qdrant,
            embedding,
            gemini,
            history_db_path,
            port,
            docs_dir,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
