//! Document ingestion: front-matter removal, word-window chunking, metadata
//! classification, and batched upload into the vector index.

pub mod chunk;
pub mod classify;
pub mod frontmatter;
pub mod pipeline;

pub use chunk::{chunk_words, ChunkParams, MIN_CHUNK_CHARS};
pub use classify::{classify_module, derive_chapter_title};
pub use frontmatter::strip_front_matter;
pub use pipeline::{ingest_directory, prepare_document, DocumentChunk, IngestParams, IngestReport};
