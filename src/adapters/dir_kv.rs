//! Directory-backed key-value store: one JSON document per key.
//!
//! Keys like `"resume <uuid>"` become file names with the space replaced,
//! suffixed `.json`. Writes are atomic (temp file + rename) so a crash
//! mid-write never leaves a torn record — the store either holds the
//! previous value or the new one.

use crate::clients::{BoxError, KvStore};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// [`KvStore`] that writes each key as a JSON file under a root directory.
pub struct DirKvStore {
    root: PathBuf,
}

impl DirKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are "resume <uuid>"; anything path-hostile is normalized.
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KvStore for DirKvStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let target = self.path_for(key);

        // Atomic write: write to temp, then rename.
        let tmp = target.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &target).await?;

        debug!("kv set {} → {}", key, target.display());
        Ok(())
    }
}
