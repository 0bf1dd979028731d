//! Per-site check state machine.
//!
//! The transition logic itself is a pure function ([`plan_check`]) from
//! (previous record, check attempt) to (new status, snapshot action); the
//! [`SiteChecker`] executes those plans against the collaborator traits and
//! owns the all-or-nothing lifecycle operations (add, resolve, delete).
//!
//! Invariant enforced throughout: `baseline_fingerprint` changes only when a
//! site is created or a pending change is resolved. A routine check may
//! move status and timestamps, never the comparison basis.

use crate::error::{CheckerError, Result};
use chrono::Utc;
use std::sync::Arc;
use vigil_core::{
    urls, CheckOutcome, Fetcher, Site, SiteId, SiteRecordStore, SiteStatus, SnapshotStore,
};

/// Outcome of one fetch-and-fingerprint attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckAttempt {
    /// The page was fetched and fingerprinted.
    Fetched {
        /// Raw HTML as fetched
        html: String,
        /// Content signature of the fetched HTML
        fingerprint: String,
    },
    /// The fetch failed, or the response could not be fingerprinted.
    Failed,
}

/// Snapshot-store side effect a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotAction {
    /// Write the fetched HTML into the latest slot.
    WriteLatest,
    /// Delete the latest slot (content reverted to baseline).
    DeleteLatest,
    /// Leave both slots untouched.
    Keep,
}

/// Planned result of a check transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPlan {
    /// Status the site lands in
    pub status: SiteStatus,
    /// Snapshot write the executor must perform
    pub action: SnapshotAction,
}

/// Pure transition function of the state machine.
///
/// - A failed attempt yields `Error` and leaves both snapshot slots as-is;
///   an error must not erase a pending change.
/// - A fetch matching the baseline fingerprint yields `Passed` and clears
///   any stale latest slot.
/// - A fetch differing from the baseline yields `Changed` and (over)writes
///   the latest slot. The comparison basis is always the last *accepted*
///   baseline, never the previous latest.
#[must_use]
pub fn plan_check(site: &Site, attempt: &CheckAttempt) -> CheckPlan {
    match attempt {
        CheckAttempt::Failed => CheckPlan {
            status: SiteStatus::Error,
            action: SnapshotAction::Keep,
        },
        CheckAttempt::Fetched { fingerprint, .. } => {
            if *fingerprint == site.baseline_fingerprint {
                CheckPlan {
                    status: SiteStatus::Passed,
                    action: SnapshotAction::DeleteLatest,
                }
            } else {
                CheckPlan {
                    status: SiteStatus::Changed,
                    action: SnapshotAction::WriteLatest,
                }
            }
        }
    }
}

/// Executes check plans and site lifecycle operations against the
/// collaborator capabilities.
pub struct SiteChecker {
    fetcher: Arc<dyn Fetcher>,
    snapshots: Arc<dyn SnapshotStore>,
    records: Arc<dyn SiteRecordStore>,
}

impl SiteChecker {
    /// Create a new checker over the given collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        snapshots: Arc<dyn SnapshotStore>,
        records: Arc<dyn SiteRecordStore>,
    ) -> Self {
        Self {
            fetcher,
            snapshots,
            records,
        }
    }

    /// Run one check for a site and persist the result.
    ///
    /// Fetch and parse failures are recovered locally into the `Error`
    /// transition; they never surface as a failed call. Storage failures do
    /// surface, as `CheckOutcome::StorageFailed`, and leave the previously
    /// persisted record as the last known-good state.
    pub async fn check_site(&self, site: &Site) -> CheckOutcome {
        let attempt = match self.fetcher.fetch(&site.url).await {
            Ok(html) => match vigil_html::fingerprint(&html) {
                Ok(fingerprint) => CheckAttempt::Fetched { html, fingerprint },
                Err(e) => {
                    tracing::warn!("Could not fingerprint {}: {}", site.url, e);
                    CheckAttempt::Failed
                }
            },
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", site.url, e);
                CheckAttempt::Failed
            }
        };

        let plan = plan_check(site, &attempt);

        let snapshot_result = match (plan.action, &attempt) {
            (SnapshotAction::WriteLatest, CheckAttempt::Fetched { html, .. }) => {
                self.snapshots.put_latest(&site.id, html).await
            }
            (SnapshotAction::DeleteLatest, _) => self.snapshots.delete_latest(&site.id).await,
            _ => Ok(()),
        };
        if let Err(error) = snapshot_result {
            tracing::error!("Snapshot write failed for {}: {}", site.id, error);
            return CheckOutcome::StorageFailed {
                site: site.clone(),
                error,
            };
        }

        let updated = Site {
            last_checked_at: Utc::now(),
            status: plan.status,
            ..site.clone()
        };

        match self.records.upsert(&updated).await {
            Ok(()) => {
                tracing::debug!("Checked {}: {}", updated.name, updated.status);
                CheckOutcome::Checked(updated)
            }
            Err(error) => {
                tracing::error!("Record update failed for {}: {}", site.id, error);
                CheckOutcome::StorageFailed {
                    site: site.clone(),
                    error,
                }
            }
        }
    }

    /// Add a new site: fetch it once and accept that content as baseline.
    ///
    /// All-or-nothing: any failure (fetch, fingerprint, baseline write,
    /// record write) aborts creation without leaving partial state behind.
    /// The baseline blob is written before the record becomes visible, so a
    /// crash in between leaves an orphaned blob rather than a blob-less
    /// record; [`Self::reconcile_snapshots`] sweeps those at startup.
    pub async fn add_site(&self, url: &str) -> Result<Site> {
        let html = self.fetcher.fetch(url).await?;
        let fingerprint = vigil_html::fingerprint(&html)?;

        let domain = urls::extract_domain(url);
        let now = Utc::now();
        let site = Site {
            id: SiteId::generate(),
            name: domain.clone(),
            url: url.to_string(),
            favicon_url: urls::favicon_url(&domain),
            created_at: now,
            last_checked_at: now,
            status: SiteStatus::Passed,
            baseline_fingerprint: fingerprint,
        };

        self.snapshots.put_baseline(&site.id, &html).await?;
        if let Err(error) = self.records.upsert(&site).await {
            if let Err(cleanup) = self.snapshots.delete_all(&site.id).await {
                tracing::warn!(
                    "Could not clean up baseline for aborted add of {}: {}",
                    site.id,
                    cleanup
                );
            }
            return Err(error.into());
        }

        tracing::info!("Added site: {} ({})", domain, url);
        Ok(site)
    }

    /// Promote a pending change into the accepted baseline.
    ///
    /// Reads the latest blob, re-fingerprints it, moves it into the
    /// baseline slot, and drives status back to `Passed`. With no latest
    /// blob this degrades to a status reset: fingerprint and baseline stay
    /// untouched. The record is only written after every snapshot step
    /// succeeded; promotion before latest-deletion means a crash in between
    /// converges on a re-resolve.
    pub async fn resolve_site(&self, id: &SiteId) -> Result<Site> {
        let site = self
            .records
            .get_by_id(id)
            .await?
            .ok_or_else(|| CheckerError::SiteNotFound(id.clone()))?;

        let updated = match self.snapshots.get_latest(id).await? {
            Some(html) => {
                let fingerprint = vigil_html::fingerprint(&html)?;
                self.snapshots.put_baseline(id, &html).await?;
                self.snapshots.delete_latest(id).await?;
                Site {
                    status: SiteStatus::Passed,
                    baseline_fingerprint: fingerprint,
                    ..site
                }
            }
            None => Site {
                status: SiteStatus::Passed,
                ..site
            },
        };

        self.records.upsert(&updated).await?;
        tracing::info!(
            "Resolved site {}: new baseline {}",
            updated.name,
            updated.baseline_fingerprint
        );
        Ok(updated)
    }

    /// Delete a site record and both of its snapshot slots.
    pub async fn delete_site(&self, id: &SiteId) -> Result<()> {
        self.records.delete(id).await?;
        self.snapshots.delete_all(id).await?;
        tracing::info!("Deleted site: {}", id);
        Ok(())
    }

    /// Sweep snapshot blobs that have no corresponding site record.
    ///
    /// Covers the add-site crash window (baseline written, record never
    /// created). Returns the number of orphaned sites swept.
    pub async fn reconcile_snapshots(&self) -> Result<usize> {
        let mut removed = 0;
        for id in self.snapshots.list_site_ids().await? {
            if self.records.get_by_id(&id).await?.is_none() {
                tracing::warn!("Sweeping orphaned snapshots for {}", id);
                self.snapshots.delete_all(&id).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
