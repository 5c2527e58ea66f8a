//! Vector index trait
//!
//! The index is an external service; this trait covers the two calls the
//! pipeline needs: bulk insert at build time and nearest-neighbor query at
//! ask time.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A raw nearest-neighbor hit: the stored document text plus its metadata
#[derive(Debug, Clone, Default)]
pub struct IndexMatch {
    /// The chunk text stored alongside the vector
    pub document: String,
    /// Chunk metadata (chunk_id, book_id, title, offsets)
    pub metadata: HashMap<String, Value>,
}

/// Trait for nearest-neighbor search over embedded chunks
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` matches, nearest first, in the index's own ranking.
    /// Fewer than `k` matches is not an error; an empty index returns an
    /// empty Vec.
    async fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<IndexMatch>>;

    /// Insert a batch of embedded chunks
    async fn add(
        &self,
        ids: &[String],
        embeddings: &[Vec<f32>],
        documents: &[String],
        metadatas: &[HashMap<String, Value>],
    ) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
