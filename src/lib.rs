//! gutenrag: RAG over public-domain books
//!
//! Ingests cleaned book texts, chunks them into a query-ready gold table,
//! loads chunk embeddings into an external vector index, and answers
//! questions over the corpus with cited sources.

pub mod config;
pub mod error;
pub mod generation;
pub mod gold;
pub mod providers;
pub mod retrieval;
pub mod server;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use gold::{build_gold, chunk_spans, ChunkRecord};
pub use retrieval::{RetrievedChunk, Retriever};
