//! Gold-layer batch CLI
//!
//! Chunks silver texts into the gold table and optionally uploads the
//! artifacts to the object store.

use std::path::PathBuf;

use clap::Parser;
use gutenrag::config::ChunkingConfig;
use gutenrag::gold::{build_gold, upload::upload_gold};
use gutenrag::providers::FsObjectStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gutenrag-gold", about = "Build the gold chunk table from silver texts")]
struct Args {
    /// Metadata CSV listing book_id, title, silver_path
    #[arg(long, default_value = "data/meta/books_meta.csv")]
    meta_csv: PathBuf,

    /// Base directory for resolving relative silver paths
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Output directory for the gold table
    #[arg(long, default_value = "data/gold")]
    gold_dir: PathBuf,

    /// Window size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value_t = 200)]
    overlap: usize,

    /// Write individual chunk text files (optional; increases storage)
    #[arg(long)]
    write_chunk_files: bool,

    /// Skip upload to the object store
    #[arg(long)]
    no_upload: bool,

    /// Root directory of the local object store
    #[arg(long, default_value = "data/objects")]
    bucket_root: PathBuf,

    /// Bucket name for gold artifacts
    #[arg(long, default_value = "gutenrag")]
    bucket: String,
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

    let chunking = ChunkingConfig {
        chunk_size: args.chunk_size,
        overlap: args.overlap,
        write_chunk_files: args.write_chunk_files,
    };

    let build = build_gold(&args.meta_csv, &args.base_dir, &args.gold_dir, &chunking)?;
    tracing::info!(
        chunks = build.records.len(),
        books = build.books_processed,
        skipped = build.books_skipped,
        "Gold build complete"
    );

    if !args.no_upload {
        let store = FsObjectStore::new(args.bucket_root, args.bucket);
        upload_gold(&store, &args.gold_dir).await?;
    }

    Ok(())
}
