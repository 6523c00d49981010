//! Filesystem Blob Store
//!
//! Objects are written to `{root}/{bucket}/{key}`. Serving them under the
//! configured public URL is left to whatever fronts that directory.

use std::path::{Path, PathBuf};

use axum::body::Bytes;

use crate::domain::repository::BlobStore;
use crate::error::NotesResult;

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    bucket_dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            bucket_dir: root.as_ref().join(bucket),
        }
    }

    pub fn bucket_dir(&self) -> &Path {
        &self.bucket_dir
    }

    /// Create the bucket directory if it is missing.
    pub async fn init(&self) -> NotesResult<()> {
        tokio::fs::create_dir_all(&self.bucket_dir).await?;
        tracing::info!(path = %self.bucket_dir.display(), "Blob bucket ready");
        Ok(())
    }
}

impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> NotesResult<()> {
        tokio::fs::create_dir_all(&self.bucket_dir).await?;
        tokio::fs::write(self.bucket_dir.join(key), &bytes).await?;

        tracing::debug!(key, content_type, size = bytes.len(), "Blob written");
        Ok(())
    }
    async fn delete(&self, key: &str) -> NotesResult<()> {
        match tokio::fs::remove_file(self.bucket_dir.join(key)).await {
            Ok(()) => {
                tracing::debug!(key, "Blob removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
