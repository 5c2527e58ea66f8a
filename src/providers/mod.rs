//! Provider abstractions for embeddings, answer generation, vector search,
//! and object storage
//!
//! The core pipeline only sees these traits, so tests run against
//! deterministic fakes and real backends stay swappable.

pub mod chroma;
pub mod embedding;
pub mod llm;
pub mod object_store;
pub mod ollama;
pub mod vector_index;

pub use chroma::ChromaIndex;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use object_store::{FsObjectStore, ObjectStore};
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_index::{IndexMatch, VectorIndex};
