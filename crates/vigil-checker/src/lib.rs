//! Vigil Checker - Change-detection engine and check orchestration.
//!
//! This crate holds the per-site status state machine (fetch → fingerprint →
//! transition → persist) and the bounded-concurrency orchestrator that runs
//! it across many sites, aggregating run statistics and progress events.
//! All I/O flows through the capability traits in `vigil-core`; the engine
//! owns no sockets, files, or database handles of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use vigil_checker::{CheckOrchestrator, SiteChecker};
//!
//! let checker = Arc::new(SiteChecker::new(fetcher, snapshots, records));
//! let orchestrator = CheckOrchestrator::new(checker).with_concurrency_limit(4);
//!
//! let sites = records.get_all().await?;
//! let stats = orchestrator
//!     .run_check(sites, &CancellationToken::new(), |progress| {
//!         println!("{}/{} {}", progress.completed, progress.total, progress.site_name);
//!     })
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod machine;
pub mod orchestrator;

// Re-export commonly used types
pub use error::{CheckerError, OrchestratorError, Result};
pub use machine::{plan_check, CheckAttempt, CheckPlan, SiteChecker, SnapshotAction};
pub use orchestrator::CheckOrchestrator;
