//! Gold-layer batch builder
//!
//! Reads the book metadata table, chunks each silver text, and persists the
//! resulting chunk table as CSV and Parquet. A missing silver file skips that
//! book with a warning; a missing metadata table fails the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

use super::chunker::chunk_spans;
use super::table::{self, ChunkRecord};

/// Chunk ids are zero-padded to five digits; past this many chunks per book
/// the lexicographic ordering guarantee no longer holds.
const CHUNK_ID_ORDER_LIMIT: u32 = 100_000;

/// One row of the book metadata table
#[derive(Debug, Clone, Deserialize)]
pub struct BookMeta {
    /// Stable book identifier
    pub book_id: String,
    /// Book title
    pub title: String,
    /// Path to the cleaned silver text, absolute or relative to the base dir
    pub silver_path: String,
}

/// Outcome of a gold build
#[derive(Debug)]
pub struct GoldBuild {
    /// All chunk records, grouped by book in metadata order
    pub records: Vec<ChunkRecord>,
    /// Number of books chunked
    pub books_processed: usize,
    /// Number of books skipped because their silver text was missing
    pub books_skipped: usize,
    /// Path of the written CSV table
    pub csv_path: PathBuf,
    /// Path of the written Parquet table
    pub parquet_path: PathBuf,
}

/// Build the gold chunk table from silver texts.
///
/// Chunking parameters are validated before any document is read, so a bad
/// `chunk_size`/`overlap` pair fails the whole batch up front.
pub fn build_gold(
    meta_csv: &Path,
    base_dir: &Path,
    gold_dir: &Path,
    chunking: &ChunkingConfig,
) -> Result<GoldBuild> {
    // Validate once; the empty text never yields chunks.
    chunk_spans("", chunking.chunk_size, chunking.overlap)?;

    if !meta_csv.exists() {
        return Err(Error::missing_input(format!(
            "Metadata CSV not found: {}",
            meta_csv.display()
        )));
    }

    std::fs::create_dir_all(gold_dir)?;

    let mut reader = csv::Reader::from_path(meta_csv)?;
    let books: Vec<BookMeta> = reader.deserialize().collect::<std::result::Result<_, _>>()?;

    let mut records = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut books_processed = 0usize;
    let mut books_skipped = 0usize;

    for book in &books {
        let mut silver_path = PathBuf::from(&book.silver_path);
        if silver_path.is_relative() {
            silver_path = base_dir.join(silver_path);
        }

        if !silver_path.exists() {
            tracing::warn!(
                book_id = %book.book_id,
                path = %silver_path.display(),
                "Missing silver text, skipping book"
            );
            books_skipped += 1;
            continue;
        }

        // Mirror a lossy read: silver files occasionally carry stray bytes.
        let bytes = std::fs::read(&silver_path)?;
        let text = String::from_utf8_lossy(&bytes);

        for (chunk_index, span) in chunk_spans(&text, chunking.chunk_size, chunking.overlap)?
            .enumerate()
        {
            let chunk_index = chunk_index as u32;
            if chunk_index == CHUNK_ID_ORDER_LIMIT {
                tracing::warn!(
                    book_id = %book.book_id,
                    "Book exceeds {CHUNK_ID_ORDER_LIMIT} chunks; chunk_id ordering is no longer lexicographic"
                );
            }

            let chunk_id = format!("{}_{:05}", book.book_id, chunk_index);
            if !seen_ids.insert(chunk_id.clone()) {
                return Err(Error::internal(format!(
                    "Duplicate chunk_id '{chunk_id}'; book_id values must be unique"
                )));
            }

            let chunk_path = if chunking.write_chunk_files {
                let file = gold_dir.join(format!("{chunk_id}.txt"));
                std::fs::write(&file, span.text)?;
                file.display().to_string()
            } else {
                String::new()
            };

            records.push(ChunkRecord {
                chunk_id,
                book_id: book.book_id.clone(),
                title: book.title.clone(),
                chunk_index,
                char_start: span.char_start as u64,
                char_end: span.char_end as u64,
                n_chars: (span.char_end - span.char_start) as u64,
                n_words: span.text.split_whitespace().count() as u64,
                chunk_text: span.text.to_string(),
                chunk_path,
            });
        }

        books_processed += 1;
    }

    let csv_path = gold_dir.join("gold_chunks.csv");
    let parquet_path = gold_dir.join("gold_chunks.parquet");
    table::write_csv(&records, &csv_path)?;
    table::write_parquet(&records, &parquet_path)?;

    tracing::info!(
        chunks = records.len(),
        books = books_processed,
        skipped = books_skipped,
        csv = %csv_path.display(),
        parquet = %parquet_path.display(),
        "Wrote gold chunk table"
    );

    Ok(GoldBuild {
        records,
        books_processed,
        books_skipped,
        csv_path,
        parquet_path,
    })
}
