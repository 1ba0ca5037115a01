//! Backend for the book RAG chatbot.
//!
//! Answers questions about book content by embedding the query, searching a
//! vector index of book chunks, and prompting a hosted LLM with the retrieved
//! context. Ingestion (chunking, metadata, batch upload) lives in [`ingest`].

pub mod core;
pub mod embedding;
pub mod history;
pub mod ingest;
pub mod llm;
pub mod server;
pub mod state;
pub mod vector;
