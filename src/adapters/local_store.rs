//! Directory-backed document store.
//!
//! Writes payloads under a root directory and returns the absolute file
//! path as the locator. Names are prefixed with a fresh UUID so repeated
//! uploads of `resume.pdf` never collide; the locator stays opaque to the
//! pipeline either way.

use crate::clients::{BoxError, FilePayload, FileStore, StoredFile};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// [`FileStore`] that writes into a local directory.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Store files under `root`, creating it on first upload.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn upload(&self, files: Vec<FilePayload>) -> Result<Option<StoredFile>, BoxError> {
        // The contract returns one locator; the first payload is the one
        // the caller cares about (the pipeline always sends exactly one).
        let Some(file) = files.into_iter().next() else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(&self.root).await?;
        let target = self.root.join(format!("{}-{}", Uuid::new_v4(), file.name));
        tokio::fs::write(&target, &file.bytes).await?;

        let path = target.to_string_lossy().to_string();
        debug!("Stored {} ({} bytes) at {}", file.name, file.bytes.len(), path);
        Ok(Some(StoredFile { path }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_payload_and_returns_readable_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let stored = store
            .upload(vec![FilePayload::new(
                "resume.pdf",
                "application/pdf",
                b"%PDF-1.4 fake".to_vec(),
            )])
            .await
            .unwrap()
            .expect("locator expected");

        assert!(stored.path.ends_with("resume.pdf"));
        let bytes = tokio::fs::read(&stored.path).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn repeated_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let payload = FilePayload::new("resume.pdf", "application/pdf", vec![1]);
        let a = store.upload(vec![payload.clone()]).await.unwrap().unwrap();
        let b = store.upload(vec![payload]).await.unwrap().unwrap();
        assert_ne!(a.path, b.path);
    }

    #[tokio::test]
    async fn empty_upload_returns_no_locator() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        assert!(store.upload(vec![]).await.unwrap().is_none());
    }
}
