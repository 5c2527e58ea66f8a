//! Batch build and round-trip tests for the gold layer

use std::fs;
use std::path::Path;

use gutenrag::config::ChunkingConfig;
use gutenrag::gold::table::{read_csv, read_parquet};
use gutenrag::gold::{build_gold, upload::upload_gold};
use gutenrag::providers::FsObjectStore;
use gutenrag::Error;

fn chunking(chunk_size: usize, overlap: usize, write_chunk_files: bool) -> ChunkingConfig {
    ChunkingConfig {
        chunk_size,
        overlap,
        write_chunk_files,
    }
}

/// Lay out a small corpus: two present books, one with a missing silver file.
fn write_corpus(root: &Path) {
    let silver = root.join("silver");
    fs::create_dir_all(&silver).unwrap();
    fs::write(
        silver.join("b1.txt"),
        "The quick brown fox jumps over the lazy dog, again and again and again.",
    )
    .unwrap();
    fs::write(
        silver.join("b3.txt"),
        "Call me Ishmael. Some years ago, never mind how long precisely.",
    )
    .unwrap();

    fs::write(
        root.join("books_meta.csv"),
        "book_id,title,silver_path\n\
         b1,Book One,silver/b1.txt\n\
         b2,Book Two,silver/b2.txt\n\
         b3,Book Three,silver/b3.txt\n",
    )
    .unwrap();
}

#[test]
fn missing_book_is_skipped_and_batch_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(30, 5, false),
    )
    .unwrap();

    assert_eq!(build.books_processed, 2);
    assert_eq!(build.books_skipped, 1);
    assert!(!build.records.is_empty());
    assert!(build.records.iter().all(|r| r.book_id != "b2"));
}

#[test]
fn chunk_ids_are_unique_padded_and_ordered() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(20, 4, false),
    )
    .unwrap();

    let ids: Vec<&str> = build.records.iter().map(|r| r.chunk_id.as_str()).collect();
    let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());

    assert_eq!(build.records[0].chunk_id, "b1_00000");
    assert_eq!(build.records[1].chunk_id, "b1_00001");

    // Grouped by book in metadata order, ascending chunk_index within a book.
    let b1_last = ids.iter().rposition(|id| id.starts_with("b1_")).unwrap();
    let b3_first = ids.iter().position(|id| id.starts_with("b3_")).unwrap();
    assert!(b1_last < b3_first);
    for book_id in ["b1", "b3"] {
        let records = build.records.iter().filter(|r| r.book_id == book_id);
        for (i, record) in records.enumerate() {
            assert_eq!(record.chunk_index, i as u32);
        }
    }
}

#[test]
fn offsets_cover_each_document_with_exact_overlap() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let overlap = 5u64;
    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(30, overlap as usize, false),
    )
    .unwrap();

    for book_id in ["b1", "b3"] {
        let records: Vec<_> = build
            .records
            .iter()
            .filter(|r| r.book_id == book_id)
            .collect();
        assert_eq!(records[0].char_start, 0);
        for pair in records.windows(2) {
            assert_eq!(pair[1].char_start, pair[0].char_end - overlap);
        }
        let text = fs::read_to_string(
            tmp.path().join("silver").join(format!("{book_id}.txt")),
        )
        .unwrap();
        assert_eq!(
            records.last().unwrap().char_end,
            text.chars().count() as u64
        );
    }
}

#[test]
fn csv_and_parquet_round_trip_identically() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(25, 3, false),
    )
    .unwrap();

    let from_csv = read_csv(&build.csv_path).unwrap();
    let from_parquet = read_parquet(&build.parquet_path).unwrap();

    assert_eq!(from_csv, build.records);
    assert_eq!(from_parquet, build.records);
}

#[test]
fn chunk_files_are_materialized_when_requested() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(30, 5, true),
    )
    .unwrap();

    for record in &build.records {
        assert!(!record.chunk_path.is_empty());
        let on_disk = fs::read_to_string(&record.chunk_path).unwrap();
        assert_eq!(on_disk, record.chunk_text);
    }
}

#[test]
fn chunk_path_stays_empty_without_the_flag() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());

    let build = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(30, 5, false),
    )
    .unwrap();

    assert!(build.records.iter().all(|r| r.chunk_path.is_empty()));
}

#[test]
fn missing_metadata_csv_fails_the_batch() {
    let tmp = tempfile::tempdir().unwrap();

    let err = build_gold(
        &tmp.path().join("nope.csv"),
        tmp.path(),
        &tmp.path().join("gold"),
        &chunking(30, 5, false),
    )
    .unwrap_err();

    assert!(matches!(err, Error::MissingInput(_)));
}

#[test]
fn bad_chunking_parameters_fail_before_any_output() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());
    let gold_dir = tmp.path().join("gold");

    let err = build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &gold_dir,
        &chunking(10, 10, false),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(!gold_dir.join("gold_chunks.csv").exists());
}

#[tokio::test]
async fn gold_artifacts_upload_under_the_gold_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path());
    let gold_dir = tmp.path().join("gold");

    build_gold(
        &tmp.path().join("books_meta.csv"),
        tmp.path(),
        &gold_dir,
        &chunking(30, 5, true),
    )
    .unwrap();

    let store = FsObjectStore::new(tmp.path().join("objects"), "gutenrag");
    let uploaded = upload_gold(&store, &gold_dir).await.unwrap();

    let bucket = tmp.path().join("objects").join("gutenrag");
    assert!(bucket.join("gold/gold_chunks.csv").exists());
    assert!(bucket.join("gold/gold_chunks.parquet").exists());
    assert!(bucket.join("gold/b1_00000.txt").exists());
    // Both tables plus one blob per chunk.
    assert!(uploaded >= 3);
}
