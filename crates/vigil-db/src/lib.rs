//! Vigil DB - SQLite implementation of the `SiteRecordStore` capability.
//!
//! Plain `SQLite` via `SQLx` with embedded migrations. Records are small and
//! non-sensitive (names, URLs, fingerprints), so there is no encryption
//! layer; snapshots live in the blob store, not here.
//!
//! # Example
//!
//! ```ignore
//! use vigil_db::{connect, run_migrations, SqliteSiteStore};
//!
//! let pool = connect("vigil.db").await?;
//! run_migrations(&pool).await?;
//! let store = SqliteSiteStore::new(pool).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod connection;
pub mod migrations;
pub mod sites;

// Re-export commonly used types
pub use connection::connect;
pub use migrations::run_migrations;
pub use sites::SqliteSiteStore;
