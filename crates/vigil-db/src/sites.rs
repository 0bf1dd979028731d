//! Site record persistence.
//!
//! `SqliteSiteStore` implements the `SiteRecordStore` capability on top of
//! the `sites` table and republishes the full list through a watch channel
//! after every write, so presentation layers can observe changes without
//! polling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use tokio::sync::watch;
use vigil_core::{Site, SiteId, SiteRecordStore, SiteStatus, StorageError};

/// Column order matches `fetch_all_sites` and `upsert`.
type SiteRow = (
    String, // id
    String, // name
    String, // url
    String, // favicon_url
    String, // created_at
    String, // last_checked_at
    String, // status
    String, // baseline_fingerprint
);

const SELECT_COLUMNS: &str =
    "id, name, url, favicon_url, created_at, last_checked_at, status, baseline_fingerprint";

/// `SQLite`-backed site record store with live list observation.
#[derive(Debug)]
pub struct SqliteSiteStore {
    pool: Pool<Sqlite>,
    watch_tx: watch::Sender<Vec<Site>>,
}

impl SqliteSiteStore {
    /// Create a store over an already-migrated pool.
    ///
    /// Loads the current site list so the first observed value is accurate.
    ///
    /// # Errors
    /// Returns `StorageError` if the initial list query fails.
    pub async fn new(pool: Pool<Sqlite>) -> Result<Self, StorageError> {
        let sites = fetch_all_sites(&pool).await?;
        let (watch_tx, _) = watch::channel(sites);
        Ok(Self { pool, watch_tx })
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn publish(&self) -> Result<(), StorageError> {
        let sites = fetch_all_sites(&self.pool).await?;
        // send_replace never fails, even with no subscribers.
        self.watch_tx.send_replace(sites);
        Ok(())
    }
}

#[async_trait]
impl SiteRecordStore for SqliteSiteStore {
    async fn upsert(&self, site: &Site) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO sites (id, name, url, favicon_url, created_at, last_checked_at, status, baseline_fingerprint)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 url = excluded.url,
                 favicon_url = excluded.favicon_url,
                 created_at = excluded.created_at,
                 last_checked_at = excluded.last_checked_at,
                 status = excluded.status,
                 baseline_fingerprint = excluded.baseline_fingerprint",
        )
        .bind(site.id.as_str())
        .bind(&site.name)
        .bind(&site.url)
        .bind(&site.favicon_url)
        .bind(site.created_at.to_rfc3339())
        .bind(site.last_checked_at.to_rfc3339())
        .bind(site.status.to_string())
        .bind(&site.baseline_fingerprint)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        tracing::debug!("Upserted site record {} ({})", site.id, site.name);

        self.publish().await
    }

    async fn get_all(&self) -> Result<Vec<Site>, StorageError> {
        fetch_all_sites(&self.pool).await
    }

    async fn get_by_id(&self, id: &SiteId) -> Result<Option<Site>, StorageError> {
        let row = sqlx::query_as::<_, SiteRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM sites WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(site_from_row).transpose()
    }

    async fn delete(&self, id: &SiteId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        tracing::debug!("Deleted site record {}", id);

        self.publish().await
    }

    fn observe_all(&self) -> watch::Receiver<Vec<Site>> {
        self.watch_tx.subscribe()
    }
}

async fn fetch_all_sites(pool: &Pool<Sqlite>) -> Result<Vec<Site>, StorageError> {
    let rows = sqlx::query_as::<_, SiteRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM sites ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await
    .map_err(backend)?;

    rows.into_iter().map(site_from_row).collect()
}

fn site_from_row(row: SiteRow) -> Result<Site, StorageError> {
    let (id, name, url, favicon_url, created_at, last_checked_at, status, baseline_fingerprint) =
        row;

    Ok(Site {
        id: SiteId::new(id).map_err(|e| StorageError::Backend(e.to_string()))?,
        name,
        url,
        favicon_url,
        created_at: parse_timestamp(&created_at)?,
        last_checked_at: parse_timestamp(&last_checked_at)?,
        status: status
            .parse::<SiteStatus>()
            .map_err(|e| StorageError::Backend(e.to_string()))?,
        baseline_fingerprint,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Backend(format!("invalid timestamp '{value}': {e}")))
}

fn backend(e: sqlx::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}
