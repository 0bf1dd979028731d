//! Vigil Snapshot - Filesystem implementation of the `SnapshotStore` capability.
//!
//! Each site owns two slots under a root directory: `<id>_baseline.html`
//! (the accepted reference content) and `<id>_latest.html` (the pending
//! change, present only while a site is in `Changed`). Blob-level
//! operations only; which slot is written when is the state machine's
//! business.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use vigil_core::{SiteId, SnapshotStore, StorageError};

const BASELINE_SUFFIX: &str = "_baseline.html";
const LATEST_SUFFIX: &str = "_latest.html";

/// Snapshot store backed by flat files under a root directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn baseline_path(&self, id: &SiteId) -> PathBuf {
        self.root.join(format!("{id}{BASELINE_SUFFIX}"))
    }

    fn latest_path(&self, id: &SiteId) -> PathBuf {
        self.root.join(format!("{id}{LATEST_SUFFIX}"))
    }

    async fn remove_if_present(path: &Path) -> Result<(), StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SnapshotStore for FsSnapshotStore {
    async fn put_baseline(&self, id: &SiteId, html: &str) -> Result<(), StorageError> {
        fs::write(self.baseline_path(id), html).await?;
        tracing::debug!("Saved baseline for site {} ({} bytes)", id, html.len());
        Ok(())
    }

    async fn get_baseline(&self, id: &SiteId) -> Result<String, StorageError> {
        match fs::read_to_string(self.baseline_path(id)).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(format!(
                "baseline snapshot for site {id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_latest(&self, id: &SiteId, html: &str) -> Result<(), StorageError> {
        fs::write(self.latest_path(id), html).await?;
        tracing::debug!("Saved latest for site {} ({} bytes)", id, html.len());
        Ok(())
    }

    async fn get_latest(&self, id: &SiteId) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.latest_path(id)).await {
            Ok(html) => Ok(Some(html)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_latest(&self, id: &SiteId) -> Result<(), StorageError> {
        Self::remove_if_present(&self.latest_path(id)).await
    }

    async fn delete_all(&self, id: &SiteId) -> Result<(), StorageError> {
        Self::remove_if_present(&self.baseline_path(id)).await?;
        Self::remove_if_present(&self.latest_path(id)).await?;
        tracing::debug!("Deleted all snapshots for site {}", id);
        Ok(())
    }

    async fn list_site_ids(&self) -> Result<Vec<SiteId>, StorageError> {
        let mut ids = HashSet::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            let raw_id = name
                .strip_suffix(BASELINE_SUFFIX)
                .or_else(|| name.strip_suffix(LATEST_SUFFIX));

            if let Some(raw_id) = raw_id {
                // Stray files that are not snapshot slots are ignored.
                if let Ok(id) = SiteId::new(raw_id) {
                    ids.insert(id);
                }
            }
        }

        Ok(ids.into_iter().collect())
    }
}
