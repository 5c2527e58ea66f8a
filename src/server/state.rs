//! Shared application state

use std::sync::Arc;

use crate::config::RagConfig;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorIndex};
use crate::retrieval::Retriever;

/// Shared state for all request handlers
///
/// Holds only `Arc`s; handlers build everything request-scoped per call, so
/// concurrent queries need no coordination.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RagConfig>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndex>,
}

impl AppState {
    /// Create state from a config and injected providers
    pub fn new(
        config: Arc<RagConfig>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            config,
            embedder,
            llm,
            index,
        }
    }

    /// The immutable configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The embedding provider
    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    /// The LLM provider
    pub fn llm(&self) -> &dyn LlmProvider {
        self.llm.as_ref()
    }

    /// Build a retriever over the vector index
    pub fn retriever(&self) -> Retriever {
        Retriever::new(
            Arc::clone(&self.index),
            self.config.retrieval.snippet_chars,
        )
    }
}
