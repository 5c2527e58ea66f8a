//! RAG server binary
//!
//! Run with: cargo run --bin gutenrag-server

use std::sync::Arc;

use gutenrag::config::RagConfig;
use gutenrag::providers::{ChromaIndex, OllamaClient, OllamaEmbedder, OllamaLlm};
use gutenrag::server::{state::AppState, RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gutenrag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::from_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chroma collection: {}", config.index.collection);
    tracing::info!("  - Default k: {}", config.retrieval.default_k);
    tracing::info!(
        "  - Max context chars: {}",
        config.retrieval.max_context_chars
    );

    let ollama = Arc::new(OllamaClient::new(&config.llm)?);
    if !ollama.health_check().await? {
        tracing::warn!("Ollama not reachable at {}", config.llm.base_url);
        tracing::warn!("Start it with: ollama serve");
    }

    let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&ollama)));
    let llm = Arc::new(OllamaLlm::new(ollama, config.llm.generate_model.clone()));
    let index = Arc::new(ChromaIndex::connect(&config.index).await?);

    let state = AppState::new(Arc::new(config.clone()), embedder, llm, index);
    let server = RagServer::new(config, state);

    tracing::info!("  GET /ask?question=...&k=5");
    tracing::info!("  GET /health");

    server.start().await?;

    Ok(())
}
