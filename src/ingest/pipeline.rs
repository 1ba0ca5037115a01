//! Document pipeline and batched ingestion.
//!
//! A document flows front-matter stripping → word-window chunking →
//! metadata classification, then its surviving chunks are embedded and
//! upserted in fixed-size batches. Ingestion is best-effort: a failed
//! embedding skips that chunk, a failed upload skips that batch, and the
//! run always continues to the next unit of work.

use std::path::Path;

use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::embedding::Embedder;
use crate::vector::{ChunkPayload, IndexPoint, VectorIndex};

use super::chunk::{chunk_words, ChunkParams, MIN_CHUNK_CHARS};
use super::classify::{classify_module, derive_chapter_title};
use super::frontmatter::strip_front_matter;

/// A chunk of one document with its derived metadata. Immutable once
/// produced; `chunk_index` values are gapless and 0-based per document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub text: String,
    pub source_file: String,
    pub chunk_index: usize,
    pub module: String,
    pub chapter: String,
}

#[derive(Debug, Clone)]
pub struct IngestParams {
    pub chunk: ChunkParams,
    /// Chunks per upsert request, bounding request size.
    pub batch_size: usize,
}

impl Default for IngestParams {
    fn default() -> Self {
        Self {
            chunk: ChunkParams::default(),
            batch_size: 100,
        }
    }
}

/// Counters accumulated over one ingestion run.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub chunks_uploaded: usize,
    pub chunks_skipped: usize,
    pub batches_failed: usize,
}

/// Per-document upload counters.
#[derive(Debug, Default, Clone)]
pub struct DocumentReport {
    pub chunks_uploaded: usize,
    pub chunks_skipped: usize,
    pub batches_failed: usize,
}

/// Run the chunking pipeline over one document's raw text.
///
/// Returns an empty sequence when the body (after front-matter removal)
/// is too short to be worth indexing.
pub fn prepare_document(
    source_name: &str,
    raw_text: &str,
    params: &ChunkParams,
) -> Vec<DocumentChunk> {
    let body = strip_front_matter(raw_text);
    if body.len() < MIN_CHUNK_CHARS {
        return Vec::new();
    }

    let module = classify_module(source_name);
    let chapter = derive_chapter_title(source_name);

    chunk_words(body, params)
        .into_iter()
        .enumerate()
        .map(|(chunk_index, text)| DocumentChunk {
            text,
            source_file: source_name.to_string(),
            chunk_index,
            module: module.to_string(),
            chapter: chapter.clone(),
        })
        .collect()
}

/// Embed the given chunks and upsert them in batches.
pub async fn upload_chunks(
    chunks: Vec<DocumentChunk>,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    batch_size: usize,
) -> DocumentReport {
    let mut report = DocumentReport::default();
    let mut points = Vec::new();

    for chunk in chunks {
        let input = [chunk.text.clone()];
        let mut vectors = match embedder.embed(&input).await {
            Ok(vectors) => vectors,
            Err(err) => {
                tracing::warn!(
                    "Failed to embed chunk {} of {}: {}",
                    chunk.chunk_index,
                    chunk.source_file,
                    err
                );
                report.chunks_skipped += 1;
                continue;
            }
        };
        if vectors.is_empty() {
            report.chunks_skipped += 1;
            continue;
        }

        points.push(IndexPoint {
            id: Uuid::new_v4().to_string(),
            vector: vectors.remove(0),
            payload: ChunkPayload {
                id: Uuid::new_v4().to_string(),
                module: chunk.module,
                chapter: chunk.chapter,
                text: chunk.text,
                anchor: None,
                source_file: Some(chunk.source_file),
                chunk_index: Some(chunk.chunk_index),
            },
        });
    }

    let batch_size = batch_size.max(1);
    for (batch_no, batch) in points.chunks(batch_size).enumerate() {
        match index.upsert(batch.to_vec()).await {
            Ok(()) => report.chunks_uploaded += batch.len(),
            Err(err) => {
                tracing::warn!("Failed to upload batch {}: {}", batch_no + 1, err);
                report.batches_failed += 1;
            }
        }
    }

    report
}

/// Pipeline + upload for a single document.
pub async fn ingest_document(
    source_name: &str,
    raw_text: &str,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    params: &IngestParams,
) -> DocumentReport {
    let chunks = prepare_document(source_name, raw_text, &params.chunk);
    upload_chunks(chunks, embedder, index, params.batch_size).await
}

/// Ingest every markdown file in `dir`, sequentially, best-effort.
pub async fn ingest_directory(
    dir: &Path,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    params: &IngestParams,
) -> Result<IngestReport, ApiError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|err| ApiError::Internal(format!("failed to read {}: {}", dir.display(), err)))?;

    let mut report = IngestReport::default();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_markdown(&path) {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let raw_text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Skipping {}: {}", name, err);
                report.documents_skipped += 1;
                continue;
            }
        };

        let chunks = prepare_document(&name, &raw_text, &params.chunk);
        if chunks.is_empty() {
            tracing::info!("Skipping {} - content too short", name);
            report.documents_skipped += 1;
            continue;
        }

        tracing::info!(
            "Processing {} ({} chunks, module {})",
            name,
            chunks.len(),
            chunks[0].module
        );

        let doc = upload_chunks(chunks, embedder, index, params.batch_size).await;
        report.documents_processed += 1;
        report.chunks_uploaded += doc.chunks_uploaded;
        report.chunks_skipped += doc.chunks_skipped;
        report.batches_failed += doc.batches_failed;
    }

    Ok(report)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "md" || ext == "markdown"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::vector::ScoredPoint;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            Ok(inputs.iter().map(|_| vec![0.5; 8]).collect())
        }
    }

    /// Records upserted points; optionally fails on one upsert call.
    struct RecordingIndex {
        points: Mutex<Vec<IndexPoint>>,
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl RecordingIndex {
        fn new(fail_on_call: Option<usize>) -> Self {
            Self {
                points: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                fail_on_call,
            }
        }
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        async fn ensure_collection(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn upsert(&self, points: Vec<IndexPoint>) -> Result<(), ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                return Err(ApiError::Upstream("simulated upload failure".to_string()));
            }
            self.points.lock().unwrap().extend(points);
            Ok(())
        }

        async fn search(&self, _: &[f32], _: usize) -> Result<Vec<ScoredPoint>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn prepare_attaches_metadata_and_gapless_indices() {
        let doc = format!("---\ntitle: ROS 2 Intro\n---\n{}", words(2000));
        let chunks = prepare_document("ros2_intro.md", &doc, &ChunkParams::default());

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
            assert_eq!(chunk.source_file, "ros2_intro.md");
            assert_eq!(chunk.module, "Module 1: Robotic Nervous System (ROS 2)");
            assert_eq!(chunk.chapter, "Ros2 Intro");
            assert!(chunk.text.split_whitespace().count() <= 800);
            assert!(chunk.text.trim().len() >= MIN_CHUNK_CHARS);
        }
    }

    #[test]
    fn prepare_skips_too_short_body() {
        let doc = "---\ntitle: Stub\n---\nshort";
        assert!(prepare_document("stub.md", doc, &ChunkParams::default()).is_empty());
    }

    #[tokio::test]
    async fn uploads_full_document_end_to_end() {
        let index = RecordingIndex::new(None);
        let doc = format!("---\ntitle: Intro\n---\n{}", words(2000));

        let report = ingest_document(
            "overview.md",
            &doc,
            &StubEmbedder,
            &index,
            &IngestParams::default(),
        )
        .await;

        assert_eq!(report.chunks_uploaded, 3);
        assert_eq!(report.chunks_skipped, 0);
        assert_eq!(report.batches_failed, 0);

        let points = index.points.lock().unwrap();
        assert_eq!(points.len(), 3);
        // Every point gets a fresh non-empty id and full payload.
        for point in points.iter() {
            assert!(!point.id.is_empty());
            assert_eq!(point.payload.source_file.as_deref(), Some("overview.md"));
            assert_eq!(point.payload.module, "Introduction");
        }
    }

    #[tokio::test]
    async fn failed_batch_does_not_stop_the_run() {
        // 10 chunks at batch size 2 -> 5 batches; batch 2 fails.
        let index = RecordingIndex::new(Some(2));
        let params = IngestParams {
            chunk: ChunkParams {
                window_size: 10,
                overlap: 0,
            },
            batch_size: 2,
        };

        let report = ingest_document("notes.md", &words(100), &StubEmbedder, &index, &params).await;

        assert_eq!(index.calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.batches_failed, 1);
        assert_eq!(report.chunks_uploaded, 8);
        assert_eq!(index.points.lock().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn directory_ingestion_counts_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ros2_intro.md"), words(900)).unwrap();
        std::fs::write(dir.path().join("tiny.md"), "hi").unwrap();
        std::fs::write(dir.path().join("notes.txt"), words(900)).unwrap();

        let index = RecordingIndex::new(None);
        let report = ingest_directory(
            dir.path(),
            &StubEmbedder,
            &index,
            &IngestParams::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.documents_processed, 1);
        assert_eq!(report.documents_skipped, 1);
        assert_eq!(report.chunks_uploaded, 2);
    }
}
