//! Query-time retrieval: nearest chunks mapped to bounded source snippets

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::providers::vector_index::{IndexMatch, VectorIndex};

/// A retrieved chunk projected for prompts and API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk identifier
    pub chunk_id: String,
    /// Source book identifier
    pub book_id: String,
    /// Source book title
    pub title: String,
    /// Bounded snippet of the chunk text, newlines collapsed to spaces
    pub text_snippet: String,
}

/// Retriever over an external vector index
///
/// Stateless per call; concurrent queries share it behind an `Arc` without
/// coordination.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    snippet_chars: usize,
}

impl Retriever {
    /// Create a retriever with the given snippet bound
    pub fn new(index: Arc<dyn VectorIndex>, snippet_chars: usize) -> Self {
        Self {
            index,
            snippet_chars,
        }
    }

    /// Fetch the top-k nearest chunks for a query embedding.
    ///
    /// Results keep the index's own ranking, nearest first. An index with
    /// fewer than `k` matches returns what it has; zero matches is an empty
    /// Vec, never an error.
    pub async fn retrieve(&self, query_embedding: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(Error::invalid_parameter("k must be >= 1"));
        }

        let matches = self.index.query(query_embedding, k).await?;
        Ok(matches
            .into_iter()
            .map(|m| self.project(m))
            .collect())
    }

    fn project(&self, m: IndexMatch) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: meta_str(&m.metadata, "chunk_id"),
            book_id: meta_str(&m.metadata, "book_id"),
            title: meta_str(&m.metadata, "title"),
            text_snippet: snippet(&m.document, self.snippet_chars),
        }
    }
}

fn meta_str(metadata: &std::collections::HashMap<String, Value>, key: &str) -> String {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Truncate to at most `max_chars` characters and collapse newlines so the
/// snippet stays a single prompt-safe line.
fn snippet(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    truncated.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct StaticIndex {
        matches: Vec<IndexMatch>,
    }

    #[async_trait]
    impl VectorIndex for StaticIndex {
        async fn query(&self, _embedding: &[f32], k: usize) -> Result<Vec<IndexMatch>> {
            Ok(self.matches.iter().take(k).cloned().collect())
        }

        async fn add(
            &self,
            _ids: &[String],
            _embeddings: &[Vec<f32>],
            _documents: &[String],
            _metadatas: &[HashMap<String, Value>],
        ) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn meta(chunk_id: &str, book_id: &str, title: &str) -> HashMap<String, Value> {
        HashMap::from([
            ("chunk_id".to_string(), json!(chunk_id)),
            ("book_id".to_string(), json!(book_id)),
            ("title".to_string(), json!(title)),
        ])
    }

    fn retriever(matches: Vec<IndexMatch>) -> Retriever {
        Retriever::new(Arc::new(StaticIndex { matches }), 300)
    }

    #[tokio::test]
    async fn returns_fewer_than_k_without_error() {
        let matches = vec![
            IndexMatch {
                document: "first chunk".into(),
                metadata: meta("b1_00000", "b1", "Book One"),
            },
            IndexMatch {
                document: "second chunk".into(),
                metadata: meta("b1_00001", "b1", "Book One"),
            },
        ];
        let chunks = retriever(matches).retrieve(&[0.1, 0.2], 5).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "b1_00000");
        assert_eq!(chunks[1].chunk_id, "b1_00001");
    }

    #[tokio::test]
    async fn empty_index_returns_empty_sequence() {
        let chunks = retriever(vec![]).retrieve(&[0.1], 5).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn rejects_zero_k() {
        let err = retriever(vec![]).retrieve(&[0.1], 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn snippet_is_bounded_and_single_line() {
        let long_text = format!("line one\nline two\n{}", "x".repeat(400));
        let matches = vec![IndexMatch {
            document: long_text,
            metadata: meta("b2_00000", "b2", "Book Two"),
        }];
        let chunks = retriever(matches).retrieve(&[0.1], 1).await.unwrap();
        let snippet = &chunks[0].text_snippet;
        assert!(snippet.chars().count() <= 300);
        assert!(!snippet.contains('\n'));
        assert!(snippet.starts_with("line one line two"));
    }

    #[tokio::test]
    async fn missing_metadata_defaults_to_empty_strings() {
        let matches = vec![IndexMatch {
            document: "orphan text".into(),
            metadata: HashMap::new(),
        }];
        let chunks = retriever(matches).retrieve(&[0.1], 1).await.unwrap();
        assert_eq!(chunks[0].chunk_id, "");
        assert_eq!(chunks[0].book_id, "");
        assert_eq!(chunks[0].title, "");
        assert_eq!(chunks[0].text_snippet, "orphan text");
    }
}
