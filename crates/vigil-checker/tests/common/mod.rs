//! In-memory collaborator fakes for driving the checker without network or
//! disk I/O.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use vigil_core::{
    urls, FetchError, Fetcher, Site, SiteId, SiteRecordStore, SiteStatus, SnapshotStore,
    StorageError,
};

/// Fetcher that serves scripted per-URL responses and tracks how many
/// fetches are in flight at once.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every fetch open for `delay` so overlap is observable.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn serve(&self, url: &str, html: &str) {
        self.pages
            .lock()
            .expect("pages lock")
            .insert(url.to_string(), html.to_string());
        self.failing.lock().expect("failing lock").remove(url);
    }

    pub fn fail(&self, url: &str) {
        self.failing
            .lock()
            .expect("failing lock")
            .insert(url.to_string());
    }

    pub fn panic_on(&self, url: &str) {
        self.panicking
            .lock()
            .expect("panicking lock")
            .insert(url.to_string());
    }

    /// Highest number of concurrently active fetches observed so far.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        // Drop the guard before panicking so the mutex is not poisoned for
        // the other in-flight checks.
        let scripted_panic = self.panicking.lock().expect("panicking lock").contains(url);
        if scripted_panic {
            panic!("scripted panic for {url}");
        }
        if self.failing.lock().expect("failing lock").contains(url) {
            return Err(FetchError::Transport(format!("scripted failure for {url}")));
        }
        self.pages
            .lock()
            .expect("pages lock")
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport(format!("no scripted page for {url}")))
    }
}

/// Snapshot store over two in-memory maps.
#[derive(Default)]
pub struct MemorySnapshots {
    baselines: Mutex<HashMap<SiteId, String>>,
    latests: Mutex<HashMap<SiteId, String>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn baseline(&self, id: &SiteId) -> Option<String> {
        self.baselines.lock().expect("baselines lock").get(id).cloned()
    }

    pub fn latest(&self, id: &SiteId) -> Option<String> {
        self.latests.lock().expect("latests lock").get(id).cloned()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("snapshot writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshots {
    async fn put_baseline(&self, id: &SiteId, html: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.baselines
            .lock()
            .expect("baselines lock")
            .insert(id.clone(), html.to_string());
        Ok(())
    }

    async fn get_baseline(&self, id: &SiteId) -> Result<String, StorageError> {
        self.baseline(id)
            .ok_or_else(|| StorageError::NotFound(format!("baseline snapshot for site {id}")))
    }

    async fn put_latest(&self, id: &SiteId, html: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.latests
            .lock()
            .expect("latests lock")
            .insert(id.clone(), html.to_string());
        Ok(())
    }

    async fn get_latest(&self, id: &SiteId) -> Result<Option<String>, StorageError> {
        Ok(self.latest(id))
    }

    async fn delete_latest(&self, id: &SiteId) -> Result<(), StorageError> {
        self.check_writable()?;
        self.latests.lock().expect("latests lock").remove(id);
        Ok(())
    }

    async fn delete_all(&self, id: &SiteId) -> Result<(), StorageError> {
        self.baselines.lock().expect("baselines lock").remove(id);
        self.latests.lock().expect("latests lock").remove(id);
        Ok(())
    }

    async fn list_site_ids(&self) -> Result<Vec<SiteId>, StorageError> {
        let mut ids: HashSet<SiteId> = self
            .baselines
            .lock()
            .expect("baselines lock")
            .keys()
            .cloned()
            .collect();
        ids.extend(self.latests.lock().expect("latests lock").keys().cloned());
        Ok(ids.into_iter().collect())
    }
}

/// Record store over an in-memory map with the same watch semantics as the
/// `SQLite` implementation.
pub struct MemoryRecords {
    sites: Mutex<HashMap<SiteId, Site>>,
    watch_tx: watch::Sender<Vec<Site>>,
    fail_upserts: AtomicBool,
}

impl Default for MemoryRecords {
    fn default() -> Self {
        let (watch_tx, _) = watch::channel(Vec::new());
        Self {
            sites: Mutex::new(HashMap::new()),
            watch_tx,
            fail_upserts: AtomicBool::new(false),
        }
    }
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    fn publish(&self) {
        let mut sites: Vec<Site> = self
            .sites
            .lock()
            .expect("sites lock")
            .values()
            .cloned()
            .collect();
        sites.sort_by(|a, b| (a.created_at, a.id.as_str()).cmp(&(b.created_at, b.id.as_str())));
        self.watch_tx.send_replace(sites);
    }
}

#[async_trait]
impl SiteRecordStore for MemoryRecords {
    async fn upsert(&self, site: &Site) -> Result<(), StorageError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("record writes disabled".into()));
        }
        self.sites
            .lock()
            .expect("sites lock")
            .insert(site.id.clone(), site.clone());
        self.publish();
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Site>, StorageError> {
        Ok(self.sites.lock().expect("sites lock").values().cloned().collect())
    }

    async fn get_by_id(&self, id: &SiteId) -> Result<Option<Site>, StorageError> {
        Ok(self.sites.lock().expect("sites lock").get(id).cloned())
    }

    async fn delete(&self, id: &SiteId) -> Result<(), StorageError> {
        self.sites.lock().expect("sites lock").remove(id);
        self.publish();
        Ok(())
    }

    fn observe_all(&self) -> watch::Receiver<Vec<Site>> {
        self.watch_tx.subscribe()
    }
}

/// A site record as `add_site` would have created it.
pub fn make_site(url: &str, baseline_fingerprint: &str) -> Site {
    let domain = urls::extract_domain(url);
    let now = Utc::now();
    Site {
        id: SiteId::generate(),
        name: domain.clone(),
        url: url.to_string(),
        favicon_url: urls::favicon_url(&domain),
        created_at: now,
        last_checked_at: now,
        status: SiteStatus::Passed,
        baseline_fingerprint: baseline_fingerprint.to_string(),
    }
}
