//! Check orchestration across many sites.
//!
//! Runs one state-machine check per site with a bounded number in flight,
//! funnelling every completion through the single orchestrator task. That
//! task owns the run counters and the progress callback, so aggregation
//! needs no shared mutable state and progress events are naturally
//! serialized in completion order.

use crate::error::OrchestratorError;
use crate::machine::SiteChecker;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use vigil_core::{CheckOutcome, CheckStats, ProgressEvent, Site, SiteStatus};

/// Default maximum number of checks in flight.
const DEFAULT_CONCURRENCY_LIMIT: usize = 4;

/// Bounded-concurrency driver for check runs.
pub struct CheckOrchestrator {
    checker: Arc<SiteChecker>,
    concurrency_limit: usize,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the default concurrency limit.
    #[must_use]
    pub fn new(checker: Arc<SiteChecker>) -> Self {
        Self {
            checker,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }

    /// Set the maximum number of checks in flight. Clamped to at least 1.
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Check every site in `sites`, at most `concurrency_limit` at a time.
    ///
    /// `on_progress` fires exactly once per completed site, in completion
    /// order, with a completed-count forming the sequence 1..=N. A failure
    /// while checking one site never aborts the others: fetch and parse
    /// errors become that site's `Error` status inside the state machine,
    /// and storage failures or panicked check tasks are folded into the
    /// `error` bucket here.
    ///
    /// Cancelling `cancel` stops the submission of new checks; in-flight
    /// checks drain to completion and their per-site writes are final. A
    /// cancelled run returns `OrchestratorError::Cancelled` carrying the
    /// statistics of the checks that completed.
    ///
    /// The caller must not submit the same site twice in one run; two
    /// concurrent checks of one site are not a supported scenario.
    ///
    /// # Errors
    /// Returns `OrchestratorError::Cancelled` if the run was cancelled.
    pub async fn run_check<F>(
        &self,
        sites: Vec<Site>,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<CheckStats, OrchestratorError>
    where
        F: FnMut(ProgressEvent),
    {
        let total = sites.len();
        if total == 0 {
            return Ok(CheckStats::default());
        }

        tracing::info!(
            "Starting check run for {} sites (limit {})",
            total,
            self.concurrency_limit
        );

        let mut tasks = FuturesUnordered::new();
        let mut stats = CheckStats::default();
        let mut completed = 0usize;
        let mut cancelled = false;

        for site in sites {
            if cancel.is_cancelled() {
                tracing::warn!("Check run cancelled, not submitting remaining sites");
                cancelled = true;
                break;
            }

            // Respect the concurrency limit before submitting another check.
            while tasks.len() >= self.concurrency_limit {
                if let Some(finished) = tasks.next().await {
                    Self::absorb(finished, &mut stats, &mut completed, total, &mut on_progress);
                }
            }

            let checker = Arc::clone(&self.checker);
            let name = site.name.clone();
            let handle = tokio::spawn(async move { checker.check_site(&site).await });
            tasks.push(async move { (name, handle.await) });
        }

        // Drain in-flight checks; they are final even when cancelled.
        while let Some(finished) = tasks.next().await {
            Self::absorb(finished, &mut stats, &mut completed, total, &mut on_progress);
        }

        tracing::info!(
            "Check run complete: {} changed, {} passed, {} errors",
            stats.changed,
            stats.passed,
            stats.error
        );

        if cancelled {
            return Err(OrchestratorError::Cancelled(stats));
        }
        Ok(stats)
    }

    /// Fold one finished check task into the run state and emit progress.
    fn absorb<F>(
        finished: (String, Result<CheckOutcome, tokio::task::JoinError>),
        stats: &mut CheckStats,
        completed: &mut usize,
        total: usize,
        on_progress: &mut F,
    ) where
        F: FnMut(ProgressEvent),
    {
        let (site_name, joined) = finished;

        let status = match joined {
            Ok(CheckOutcome::Checked(site)) => site.status,
            Ok(CheckOutcome::StorageFailed { site, error }) => {
                tracing::error!("Check of {} not persisted: {}", site.name, error);
                SiteStatus::Error
            }
            Err(join_error) => {
                tracing::error!("Check task for {} panicked: {}", site_name, join_error);
                SiteStatus::Error
            }
        };

        stats.record(status);
        *completed += 1;
        on_progress(ProgressEvent {
            completed: *completed,
            total,
            site_name,
        });
    }
}
