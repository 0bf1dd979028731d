//! Shared domain types for the Vigil page monitor.
//!
//! This module defines the site record, the status enum driven by the check
//! state machine, and the ephemeral run-level aggregates.

use crate::error::{StorageError, VigilError};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Newtype for site identifiers with validation.
///
/// Site IDs must be valid UUIDs (v4 format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    /// Create a new `SiteId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a valid UUID v4.
    pub fn new(id: impl Into<String>) -> Result<Self, VigilError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a new random `SiteId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string is a valid UUID v4.
    fn validate(id: &str) -> Result<(), VigilError> {
        static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = UUID_REGEX.get_or_init(|| {
            Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
                .expect("valid regex")
        });

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(VigilError::Validation(format!(
                "invalid site ID: must be a valid UUID v4, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status a site lands in after a check.
///
/// `Passed` means the fetched content fingerprints to the accepted baseline,
/// `Changed` means it differs, `Error` means the fetch (or parse) failed.
/// Resolving a change drives the site back to `Passed`; there is no separate
/// resolved status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    /// Content matches the accepted baseline
    Passed,
    /// Content differs from the accepted baseline
    Changed,
    /// The last check failed to fetch or parse the page
    Error,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "Passed"),
            Self::Changed => write!(f, "Changed"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl FromStr for SiteStatus {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Passed" => Ok(Self::Passed),
            "Changed" => Ok(Self::Changed),
            "Error" => Ok(Self::Error),
            other => Err(VigilError::Validation(format!(
                "invalid site status '{other}'"
            ))),
        }
    }
}

/// A monitored site record.
///
/// `baseline_fingerprint` is the signature of the content the user last
/// accepted. It changes only when a site is created or a pending change is
/// resolved, never on a routine check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier
    pub id: SiteId,
    /// Display name (typically the domain)
    pub name: String,
    /// Source URL that is fetched on every check
    pub url: String,
    /// Favicon URL for presentation layers
    pub favicon_url: String,
    /// When the site was added
    pub created_at: DateTime<Utc>,
    /// When the site was last checked
    pub last_checked_at: DateTime<Utc>,
    /// Status of the most recent check
    pub status: SiteStatus,
    /// Fingerprint of the accepted baseline content
    pub baseline_fingerprint: String,
}

/// Result of checking a single site.
///
/// A fetch or parse failure is not a failed check: it is folded into the
/// `Error` status of a `Checked` site. `StorageFailed` is reserved for the
/// case where the new state could not be persisted; the stored record then
/// still holds the previous known-good state.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The check ran and its result was persisted.
    Checked(Site),
    /// The new state could not be written; the stored record is unchanged.
    StorageFailed {
        /// The site as it was before the check
        site: Site,
        /// The storage failure that prevented persistence
        error: StorageError,
    },
}

impl CheckOutcome {
    /// The site this outcome refers to.
    #[must_use]
    pub fn site(&self) -> &Site {
        match self {
            Self::Checked(site) | Self::StorageFailed { site, .. } => site,
        }
    }
}

/// Aggregate statistics for one orchestrator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStats {
    /// Number of sites checked
    pub total: usize,
    /// Sites whose content changed
    pub changed: usize,
    /// Sites that still match their baseline
    pub passed: usize,
    /// Sites whose check failed
    pub error: usize,
}

impl CheckStats {
    /// Fold one completed check into the run totals.
    pub fn record(&mut self, status: SiteStatus) {
        self.total += 1;
        match status {
            SiteStatus::Changed => self.changed += 1,
            SiteStatus::Passed => self.passed += 1,
            SiteStatus::Error => self.error += 1,
        }
    }
}

/// Progress notification emitted after each completed site in a run.
///
/// Events are delivered in completion order; `completed` forms the strictly
/// monotonic sequence 1..=total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Number of sites completed so far
    pub completed: usize,
    /// Total sites in this run
    pub total: usize,
    /// Name of the site that just finished
    pub site_name: String,
}
