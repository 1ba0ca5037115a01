//! One-shot bulk ingestion: chunk, embed, and upsert every markdown file
//! in the configured docs directory. Best-effort per batch; the summary at
//! the end reports what was skipped.

use anyhow::Context;

use bookrag_backend::core::logging;
use bookrag_backend::ingest::{ingest_directory, IngestParams};
use bookrag_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize().await?;
    logging::init(&state.paths.log_dir);

    let embedder = state
        .embedder
        .clone()
        .context("embedding service is not configured (set EMBEDDING_URL)")?;
    let index = state
        .index
        .clone()
        .context("vector index is not configured (set QDRANT_URL)")?;

    index
        .ensure_collection()
        .await
        .map_err(|err| anyhow::anyhow!("failed to initialize collection: {}", err))?;

    let docs_dir = &state.settings.docs_dir;
    tracing::info!("Populating index from {}", docs_dir.display());

    let report = ingest_directory(
        docs_dir,
        embedder.as_ref(),
        index.as_ref(),
        &IngestParams::default(),
    )
    .await
    .map_err(|err| anyhow::anyhow!("ingestion failed: {}", err))?;

    tracing::info!(
        "Done: {} documents processed, {} skipped, {} chunks uploaded, {} chunks skipped, {} batches failed",
        report.documents_processed,
        report.documents_skipped,
        report.chunks_uploaded,
        report.chunks_skipped,
        report.batches_failed
    );

    Ok(())
}
