//! Collaborator traits the check engine is driven through.
//!
//! The engine itself never performs network I/O or persistence; it consumes
//! these capabilities. Default implementations live in `vigil-fetch`,
//! `vigil-snapshot`, and `vigil-db`, but tests (and embedders) can supply
//! their own.

use crate::error::{FetchError, StorageError};
use crate::types::{Site, SiteId};
use async_trait::async_trait;
use tokio::sync::watch;

/// Fetches the raw HTML of a monitored page.
///
/// Implementations own transport policy: timeouts, redirects, TLS,
/// user-agent. The engine performs no retries of its own; a transient
/// failure simply surfaces as an `Error` check.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page at `url` and return its raw HTML body.
    ///
    /// # Errors
    /// Returns `FetchError` on any transport failure, timeout, or
    /// non-success HTTP status.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Two-slot per-site blob storage for HTML snapshots.
///
/// Each site owns at most one `baseline` blob (always present after
/// creation) and at most one `latest` blob (present only while a change is
/// pending).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Write the baseline slot, overwriting any previous baseline.
    async fn put_baseline(&self, id: &SiteId, html: &str) -> Result<(), StorageError>;

    /// Read the baseline slot.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if no baseline exists; a site record
    /// without a baseline blob is a storage invariant violation.
    async fn get_baseline(&self, id: &SiteId) -> Result<String, StorageError>;

    /// Write the latest slot, overwriting any previous latest.
    async fn put_latest(&self, id: &SiteId, html: &str) -> Result<(), StorageError>;

    /// Read the latest slot, or `None` if no change is pending.
    async fn get_latest(&self, id: &SiteId) -> Result<Option<String>, StorageError>;

    /// Delete the latest slot. Deleting an absent slot is not an error.
    async fn delete_latest(&self, id: &SiteId) -> Result<(), StorageError>;

    /// Delete both slots for a site.
    async fn delete_all(&self, id: &SiteId) -> Result<(), StorageError>;

    /// List the IDs of every site that owns at least one blob.
    ///
    /// Used by the startup reconciliation sweep to find blobs orphaned by a
    /// crash between baseline write and record creation.
    async fn list_site_ids(&self) -> Result<Vec<SiteId>, StorageError>;
}

/// Persistent store for site records.
#[async_trait]
pub trait SiteRecordStore: Send + Sync {
    /// Insert or update a site record.
    async fn upsert(&self, site: &Site) -> Result<(), StorageError>;

    /// All site records.
    async fn get_all(&self) -> Result<Vec<Site>, StorageError>;

    /// A single site record, or `None` if absent.
    async fn get_by_id(&self, id: &SiteId) -> Result<Option<Site>, StorageError>;

    /// Delete a site record. Deleting an absent record is not an error.
    async fn delete(&self, id: &SiteId) -> Result<(), StorageError>;

    /// Live subscription to the full site list.
    ///
    /// The receiver holds the current list and is updated on every upsert
    /// and delete.
    fn observe_all(&self) -> watch::Receiver<Vec<Site>>;
}
