//! Upload of gold artifacts to an object store under the `gold/` prefix

use std::path::Path;

use crate::error::Result;
use crate::providers::object_store::ObjectStore;

/// Upload the gold tables and any materialized chunk files.
///
/// Ensures the bucket exists first, then puts every `gold_chunks.*` table and
/// `*.txt` chunk blob in `gold_dir` under `gold/<filename>`. Returns the
/// number of objects uploaded.
pub async fn upload_gold(store: &dyn ObjectStore, gold_dir: &Path) -> Result<usize> {
    store.ensure_bucket().await?;

    let mut uploaded = 0usize;
    for entry in std::fs::read_dir(gold_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let content_type = if name.starts_with("gold_chunks.") {
            if name.ends_with(".csv") {
                "text/csv"
            } else {
                "application/octet-stream"
            }
        } else if name.ends_with(".txt") {
            "text/plain"
        } else {
            continue;
        };

        let data = std::fs::read(&path)?;
        store
            .put_object(&format!("gold/{name}"), &data, content_type)
            .await?;
        uploaded += 1;
    }

    tracing::info!(uploaded, store = store.name(), "Uploaded gold artifacts");
    Ok(uploaded)
}
