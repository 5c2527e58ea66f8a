//! Gold chunk table: row-oriented (CSV) and columnar (Parquet) persistence
//!
//! Both serializations carry the same columns and round-trip to identical
//! records; the CSV is the human-auditable form, the Parquet the query-ready
//! one.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the gold chunk table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Deterministic id: `{book_id}_{chunk_index:05}`
    pub chunk_id: String,
    /// Source document id
    pub book_id: String,
    /// Source document title
    pub title: String,
    /// 0-based position of the chunk within its document
    pub chunk_index: u32,
    /// Character offset of the chunk start, inclusive
    pub char_start: u64,
    /// Character offset of the chunk end, exclusive
    pub char_end: u64,
    /// Number of characters in the chunk
    pub n_chars: u64,
    /// Number of whitespace-separated words in the chunk
    pub n_words: u64,
    /// The chunk's text
    pub chunk_text: String,
    /// Path of the materialized chunk file, empty unless chunk files were written
    pub chunk_path: String,
}

/// Write the gold table as CSV
pub fn write_csv(records: &[ChunkRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the gold table back from CSV
pub fn read_csv(path: &Path) -> Result<Vec<ChunkRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn schema() -> Schema {
    Schema::new(vec![
        Field::new("chunk_id", DataType::Utf8, false),
        Field::new("book_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("chunk_index", DataType::UInt32, false),
        Field::new("char_start", DataType::UInt64, false),
        Field::new("char_end", DataType::UInt64, false),
        Field::new("n_chars", DataType::UInt64, false),
        Field::new("n_words", DataType::UInt64, false),
        Field::new("chunk_text", DataType::Utf8, false),
        Field::new("chunk_path", DataType::Utf8, false),
    ])
}

/// Convert records into a single Arrow [`RecordBatch`]
pub fn to_record_batch(records: &[ChunkRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(schema());
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.chunk_id.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.book_id.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.title.as_str()),
        )),
        Arc::new(UInt32Array::from_iter_values(
            records.iter().map(|r| r.chunk_index),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.char_start),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.char_end),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.n_chars),
        )),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.n_words),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.chunk_text.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.chunk_path.as_str()),
        )),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Write the gold table as Parquet
pub fn write_parquet(records: &[ChunkRecord], path: &Path) -> Result<()> {
    let batch = to_record_batch(records)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

/// Read the gold table back from Parquet
pub fn read_parquet(path: &Path) -> Result<Vec<ChunkRecord>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let chunk_id = str_column(&batch, "chunk_id")?;
        let book_id = str_column(&batch, "book_id")?;
        let title = str_column(&batch, "title")?;
        let chunk_index = u32_column(&batch, "chunk_index")?;
        let char_start = u64_column(&batch, "char_start")?;
        let char_end = u64_column(&batch, "char_end")?;
        let n_chars = u64_column(&batch, "n_chars")?;
        let n_words = u64_column(&batch, "n_words")?;
        let chunk_text = str_column(&batch, "chunk_text")?;
        let chunk_path = str_column(&batch, "chunk_path")?;

        for i in 0..batch.num_rows() {
            records.push(ChunkRecord {
                chunk_id: chunk_id.value(i).to_string(),
                book_id: book_id.value(i).to_string(),
                title: title.value(i).to_string(),
                chunk_index: chunk_index.value(i),
                char_start: char_start.value(i),
                char_end: char_end.value(i),
                n_chars: n_chars.value(i),
                n_words: n_words.value(i),
                chunk_text: chunk_text.value(i).to_string(),
                chunk_path: chunk_path.value(i).to_string(),
            });
        }
    }

    Ok(records)
}

fn str_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| Error::internal(format!("gold table missing string column '{name}'")))
}

fn u32_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a UInt32Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
        .ok_or_else(|| Error::internal(format!("gold table missing u32 column '{name}'")))
}

fn u64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a UInt64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<UInt64Array>())
        .ok_or_else(|| Error::internal(format!("gold table missing u64 column '{name}'")))
}
