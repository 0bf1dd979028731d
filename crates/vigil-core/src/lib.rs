//! Vigil Core - Foundation crate for the Vigil page monitor.
//!
//! This crate provides shared domain types, error handling, configuration
//! management, and the capability traits that the check engine is driven
//! through. It performs no I/O of its own.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`SiteId`, `SiteStatus`, `Site`, `CheckStats`)
//! - [`capabilities`] - Collaborator traits (`Fetcher`, `SnapshotStore`, `SiteRecordStore`)
//! - [`urls`] - Stateless URL helpers (domain extraction, favicon URLs)
//!
//! # Example
//!
//! ```rust
//! use vigil_core::{SiteId, SiteStatus, VigilConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VigilConfig::default();
//! assert!(config.checking.concurrency_limit >= 1);
//!
//! let id = SiteId::generate();
//! assert_eq!(SiteStatus::Passed.to_string(), "Passed");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod types;
pub mod urls;

// Re-export commonly used types
pub use capabilities::{Fetcher, SiteRecordStore, SnapshotStore};
pub use config::{CheckingConfig, FetchConfig, GeneralConfig, StorageConfig, VigilConfig};
pub use error::{ConfigError, ConfigResult, FetchError, Result, StorageError, VigilError};
pub use types::{CheckOutcome, CheckStats, ProgressEvent, Site, SiteId, SiteStatus};
