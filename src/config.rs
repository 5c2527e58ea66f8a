//! Configuration for the RAG system
//!
//! All settings carry defaults matching a local Ollama + Chroma setup and can
//! be overridden from the environment via [`RagConfig::from_env`]. The config
//! is built once at startup and passed by reference into each component.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Vector index configuration
    pub index: IndexConfig,
    /// Gold-layer chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval and prompt configuration
    pub retrieval: RetrievalConfig,
    /// Gold-layer batch paths
    pub gold: GoldConfig,
}

impl RagConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("OLLAMA_URL") {
            config.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("OLLAMA_LLM") {
            config.llm.generate_model = v;
        }
        if let Ok(v) = std::env::var("OLLAMA_EMBED_MODEL") {
            config.llm.embed_model = v;
        }
        if let Ok(v) = std::env::var("CHROMA_URL") {
            config.index.base_url = v;
        }
        if let Ok(v) = std::env::var("CHROMA_COLLECTION") {
            config.index.collection = v;
        }
        if let Ok(v) = std::env::var("RAG_DEFAULT_K") {
            if let Ok(k) = v.parse() {
                config.retrieval.default_k = k;
            }
        }
        if let Ok(v) = std::env::var("RAG_MAX_CONTEXT_CHARS") {
            if let Ok(n) = v.parse() {
                config.retrieval.max_context_chars = n;
            }
        }
        if let Ok(v) = std::env::var("GUTENRAG_META_CSV") {
            config.gold.meta_csv = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("GUTENRAG_SILVER_DIR") {
            config.gold.silver_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("GUTENRAG_GOLD_DIR") {
            config.gold.gold_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("GUTENRAG_BUCKET_ROOT") {
            config.gold.bucket_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("GUTENRAG_BUCKET") {
            config.gold.bucket = v;
        }

        config
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "mistral".to_string(),
            temperature: 0.0,
            timeout_secs: 300,
        }
    }
}

/// Vector index (Chroma) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Chroma server base URL
    pub base_url: String,
    /// Collection name
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            collection: "gutenberg_chunks".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Gold-layer chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
    /// Write each chunk's text as an individually addressable file
    pub write_chunk_files: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            write_chunk_files: false,
        }
    }
}

/// Retrieval and prompt assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of chunks to retrieve
    pub default_k: usize,
    /// Maximum characters of retrieved context injected into the prompt
    pub max_context_chars: usize,
    /// Maximum snippet length per retrieved chunk, in characters
    pub snippet_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            max_context_chars: 6000,
            snippet_chars: 300,
        }
    }
}

/// Gold-layer batch paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldConfig {
    /// Metadata CSV listing {book_id, title, silver_path}
    pub meta_csv: PathBuf,
    /// Directory holding cleaned silver text files
    pub silver_dir: PathBuf,
    /// Output directory for the gold table and chunk blobs
    pub gold_dir: PathBuf,
    /// Root directory of the local object store
    pub bucket_root: PathBuf,
    /// Bucket name for gold artifacts
    pub bucket: String,
}

impl Default for GoldConfig {
    fn default() -> Self {
        Self {
            meta_csv: PathBuf::from("data/meta/books_meta.csv"),
            silver_dir: PathBuf::from("data/silver"),
            gold_dir: PathBuf::from("data/gold"),
            bucket_root: PathBuf::from("data/objects"),
            bucket: "gutenrag".to_string(),
        }
    }
}
