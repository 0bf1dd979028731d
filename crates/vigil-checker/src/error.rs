//! Checker error types.

use thiserror::Error;
use vigil_core::{CheckStats, FetchError, SiteId, StorageError};

/// Errors raised by the all-or-nothing site operations (add, resolve,
/// delete, reconcile).
///
/// Routine checks never return these: fetch and parse failures are folded
/// into the site's `Error` status, and storage failures are reported
/// through `CheckOutcome::StorageFailed`.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The initial or resolve-time fetch failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The fetched content could not be fingerprinted.
    #[error("html error: {0}")]
    Html(#[from] vigil_html::HtmlError),

    /// Snapshot or record storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// No site record exists for the given ID.
    #[error("site {0} not found")]
    SiteNotFound(SiteId),
}

/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Errors raised by a whole orchestrator run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The run was cancelled before all sites were submitted.
    ///
    /// Carries the statistics for the checks that did complete; their
    /// per-site writes are final.
    #[error("check run cancelled after {} completed checks", .0.total)]
    Cancelled(CheckStats),
}
