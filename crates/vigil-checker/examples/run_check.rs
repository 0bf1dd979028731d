//! One-shot check run against real URLs.
//!
//! Usage:
//!
//! ```sh
//! cargo run --example run_check -- https://example.com https://www.rust-lang.org
//! ```
//!
//! Adds each URL as a new site in a throwaway store, runs a full check pass,
//! and prints the run statistics plus when the next periodic run would be
//! due.

use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use vigil_checker::{CheckOrchestrator, SiteChecker};
use vigil_core::{SiteRecordStore, VigilConfig};
use vigil_db::{connect, run_migrations, SqliteSiteStore};
use vigil_fetch::HttpFetcher;
use vigil_snapshot::FsSnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = VigilConfig::load_with_env().context("load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_filter)),
        )
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        anyhow::bail!("usage: run_check <url> [<url>...]");
    }

    // Throwaway stores under a temp dir; a real embedder would use
    // config.snapshot_dir() and config.database_path().
    let dir = tempfile::tempdir().context("create temp dir")?;
    let snapshots = Arc::new(FsSnapshotStore::new(dir.path().join("snapshots")).await?);

    let db_path = dir.path().join("vigil.db");
    let pool = connect(&db_path.to_string_lossy()).await?;
    run_migrations(&pool).await?;
    let records = Arc::new(SqliteSiteStore::new(pool).await?);

    let fetcher = Arc::new(HttpFetcher::from_config(&config.fetch)?);
    let checker = Arc::new(SiteChecker::new(fetcher, snapshots, records.clone()));

    checker.reconcile_snapshots().await?;

    for url in &urls {
        match checker.add_site(url).await {
            Ok(site) => println!("added {} ({})", site.name, site.url),
            Err(e) => eprintln!("could not add {url}: {e}"),
        }
    }

    let sites = records.get_all().await?;
    let orchestrator = CheckOrchestrator::new(checker)
        .with_concurrency_limit(config.checking.concurrency_limit);

    let stats = orchestrator
        .run_check(sites, &CancellationToken::new(), |p| {
            println!("[{}/{}] {}", p.completed, p.total, p.site_name);
        })
        .await?;

    println!(
        "done: {} checked, {} changed, {} passed, {} errors",
        stats.total, stats.changed, stats.passed, stats.error
    );
    println!(
        "next run due at {}",
        vigil_scheduler::next_check_timestamp(config.checking.interval_minutes)
    );

    Ok(())
}
