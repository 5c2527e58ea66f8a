//! Object store abstraction for gold artifact uploads
//!
//! The batch pipeline only needs "make sure the bucket exists" and "put an
//! object under a key". The filesystem store below is the local backend; an
//! S3-compatible service slots in behind the same trait.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Narrow capability interface over a bucket of objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create the bucket if it does not already exist
    async fn ensure_bucket(&self) -> Result<()>;

    /// Store `data` under `key` in the bucket
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Filesystem-backed object store: one directory per bucket, one file per key
pub struct FsObjectStore {
    root: PathBuf,
    bucket: String,
}

impl FsObjectStore {
    /// Create a store rooted at `root` for the named bucket
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn ensure_bucket(&self) -> Result<()> {
        let dir = self.bucket_dir();
        if dir.is_dir() {
            tracing::info!(bucket = %self.bucket, "Bucket exists");
        } else {
            std::fs::create_dir_all(&dir)
                .map_err(|e| Error::ObjectStore(format!("Failed to create bucket: {e}")))?;
            tracing::info!(bucket = %self.bucket, "Created bucket");
        }
        Ok(())
    }

    async fn put_object(&self, key: &str, data: &[u8], _content_type: &str) -> Result<()> {
        let path = self.bucket_dir().join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::ObjectStore(format!("Failed to create key prefix: {e}")))?;
        }
        std::fs::write(&path, data)
            .map_err(|e| Error::ObjectStore(format!("Failed to write object '{key}': {e}")))?;
        tracing::info!(bucket = %self.bucket, key, bytes = data.len(), "Uploaded object");
        Ok(())
    }

    fn name(&self) -> &str {
        "fs"
    }
}
