//! Database connection management.
//!
//! Opens a plain `SQLite` pool via `SQLx`. The database only holds site
//! records, so errors surface as `StorageError::Backend` for the rest of
//! the workspace.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use vigil_core::StorageError;

/// Open a connection pool to the database at `path`.
///
/// Accepts a filesystem path or `:memory:` for an in-memory database. The
/// file is created if it does not exist.
///
/// # Errors
/// Returns `StorageError::Backend` if the path is not a valid connection
/// string or the database cannot be opened.
pub async fn connect(path: &str) -> Result<Pool<Sqlite>, StorageError> {
    let options = SqliteConnectOptions::from_str(path)
        .map_err(|e| StorageError::Backend(format!("invalid connection string: {e}")))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Backend(format!("failed to open database: {e}")))?;

    tracing::info!("Database pool opened at {}", path);

    Ok(pool)
}
