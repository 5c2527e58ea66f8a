//! Embedding load CLI
//!
//! Reads the gold Parquet table, embeds each chunk, and inserts the vectors
//! into the Chroma collection.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use gutenrag::config::RagConfig;
use gutenrag::gold::table::read_parquet;
use gutenrag::providers::{ChromaIndex, EmbeddingProvider, OllamaClient, OllamaEmbedder, VectorIndex};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gutenrag-embed", about = "Load gold chunks into the vector index")]
struct Args {
    /// Path to the gold Parquet table
    #[arg(long, default_value = "data/gold/gold_chunks.parquet")]
    gold_parquet: PathBuf,

    /// Number of chunks embedded and inserted per batch
    #[arg(long, default_value_t = 32)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gutenrag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::from_env();

    let records = read_parquet(&args.gold_parquet)?;
    tracing::info!(
        chunks = records.len(),
        path = %args.gold_parquet.display(),
        "Loaded gold chunks"
    );

    let ollama = Arc::new(OllamaClient::new(&config.llm)?);
    let embedder = OllamaEmbedder::new(ollama);
    let index = ChromaIndex::connect(&config.index).await?;

    let mut inserted = 0usize;
    for batch in records.chunks(args.batch_size.max(1)) {
        let ids: Vec<String> = batch.iter().map(|r| r.chunk_id.clone()).collect();
        let texts: Vec<String> = batch.iter().map(|r| r.chunk_text.clone()).collect();
        // Everything but the chunk text travels as metadata.
        let metadatas: Vec<HashMap<String, Value>> = batch
            .iter()
            .map(|r| {
                HashMap::from([
                    ("chunk_id".to_string(), json!(r.chunk_id)),
                    ("book_id".to_string(), json!(r.book_id)),
                    ("title".to_string(), json!(r.title)),
                    ("chunk_index".to_string(), json!(r.chunk_index)),
                    ("char_start".to_string(), json!(r.char_start)),
                    ("char_end".to_string(), json!(r.char_end)),
                    ("n_chars".to_string(), json!(r.n_chars)),
                    ("n_words".to_string(), json!(r.n_words)),
                    ("chunk_path".to_string(), json!(r.chunk_path)),
                ])
            })
            .collect();

        let embeddings = embedder.embed_batch(&texts).await?;
        index.add(&ids, &embeddings, &texts, &metadatas).await?;

        inserted += batch.len();
        tracing::info!(inserted, total = records.len(), "Embedded batch");
    }

    tracing::info!(
        inserted,
        collection = index.collection(),
        "Embedding load complete"
    );

    Ok(())
}
