//! End-to-end checks of the site lifecycle and state machine against
//! in-memory collaborators.

mod common;

use common::{MemoryRecords, MemorySnapshots, ScriptedFetcher};
use std::sync::Arc;
use vigil_checker::{CheckerError, SiteChecker};
use vigil_core::{CheckOutcome, SiteId, SiteRecordStore, SiteStatus, SnapshotStore};

const PAGE_V1: &str = "<html><body><p>original content</p></body></html>";
const PAGE_V2: &str = "<html><body><p>updated content</p></body></html>";

struct Harness {
    fetcher: Arc<ScriptedFetcher>,
    snapshots: Arc<MemorySnapshots>,
    records: Arc<MemoryRecords>,
    checker: SiteChecker,
}

fn harness() -> Harness {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let snapshots = Arc::new(MemorySnapshots::new());
    let records = Arc::new(MemoryRecords::new());
    let checker = SiteChecker::new(fetcher.clone(), snapshots.clone(), records.clone());
    Harness {
        fetcher,
        snapshots,
        records,
        checker,
    }
}

fn checked(outcome: CheckOutcome) -> vigil_core::Site {
    match outcome {
        CheckOutcome::Checked(site) => site,
        CheckOutcome::StorageFailed { error, .. } => {
            panic!("expected persisted check, got storage failure: {error}")
        }
    }
}

#[tokio::test]
async fn test_add_site_accepts_initial_content_as_baseline() {
    let h = harness();
    h.fetcher.serve("https://example.com/news", PAGE_V1);

    let site = h
        .checker
        .add_site("https://example.com/news")
        .await
        .expect("add site");

    assert_eq!(site.name, "example.com");
    assert_eq!(site.status, SiteStatus::Passed);
    assert_eq!(
        site.baseline_fingerprint,
        vigil_html::fingerprint(PAGE_V1).expect("fingerprint")
    );

    assert_eq!(h.snapshots.baseline(&site.id), Some(PAGE_V1.to_string()));
    assert_eq!(h.snapshots.latest(&site.id), None);

    let stored = h
        .records
        .get_by_id(&site.id)
        .await
        .expect("get record")
        .expect("record present");
    assert_eq!(stored, site);
}

#[tokio::test]
async fn test_unchanged_content_stays_passed() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    let after = checked(h.checker.check_site(&site).await);

    assert_eq!(after.status, SiteStatus::Passed);
    assert_eq!(after.baseline_fingerprint, site.baseline_fingerprint);
    assert_eq!(h.snapshots.latest(&site.id), None);
    assert!(after.last_checked_at >= site.last_checked_at);
}

#[tokio::test]
async fn test_markup_only_change_stays_passed() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    // Same visible text, different markup and scripts.
    h.fetcher.serve(
        "https://example.com",
        "<html><head><script>track()</script></head>\
         <body><div><p>original   content</p></div></body></html>",
    );
    let after = checked(h.checker.check_site(&site).await);

    assert_eq!(after.status, SiteStatus::Passed);
    assert_eq!(h.snapshots.latest(&site.id), None);
}

#[tokio::test]
async fn test_changed_content_writes_latest_and_keeps_baseline() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    let after = checked(h.checker.check_site(&site).await);

    assert_eq!(after.status, SiteStatus::Changed);
    // The comparison basis survives the check.
    assert_eq!(after.baseline_fingerprint, site.baseline_fingerprint);
    assert_eq!(h.snapshots.baseline(&site.id), Some(PAGE_V1.to_string()));
    assert_eq!(h.snapshots.latest(&site.id), Some(PAGE_V2.to_string()));
}

#[tokio::test]
async fn test_reverted_content_clears_pending_change() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    let changed = checked(h.checker.check_site(&site).await);
    assert_eq!(changed.status, SiteStatus::Changed);

    h.fetcher.serve("https://example.com", PAGE_V1);
    let reverted = checked(h.checker.check_site(&changed).await);

    assert_eq!(reverted.status, SiteStatus::Passed);
    assert_eq!(h.snapshots.latest(&site.id), None);
}

#[tokio::test]
async fn test_fetch_failure_keeps_pending_latest() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    let changed = checked(h.checker.check_site(&site).await);

    h.fetcher.fail("https://example.com");
    let errored = checked(h.checker.check_site(&changed).await);

    assert_eq!(errored.status, SiteStatus::Error);
    // An error must not erase the evidence of the pending change.
    assert_eq!(h.snapshots.latest(&site.id), Some(PAGE_V2.to_string()));
    assert_eq!(errored.baseline_fingerprint, site.baseline_fingerprint);
}

#[tokio::test]
async fn test_unfingerprintable_content_is_an_error_check() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    // Fetch succeeds but the page has no visible text at all.
    h.fetcher
        .serve("https://example.com", "<html><head><script>x()</script></head></html>");
    let after = checked(h.checker.check_site(&site).await);

    assert_eq!(after.status, SiteStatus::Error);
}

#[tokio::test]
async fn test_resolve_promotes_latest_to_baseline() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    let changed = checked(h.checker.check_site(&site).await);
    assert_eq!(changed.status, SiteStatus::Changed);

    let resolved = h.checker.resolve_site(&site.id).await.expect("resolve site");

    assert_eq!(resolved.status, SiteStatus::Passed);
    assert_eq!(
        resolved.baseline_fingerprint,
        vigil_html::fingerprint(PAGE_V2).expect("fingerprint")
    );
    assert_eq!(h.snapshots.baseline(&site.id), Some(PAGE_V2.to_string()));
    assert_eq!(h.snapshots.latest(&site.id), None);

    // The next check against the new baseline passes.
    let after = checked(h.checker.check_site(&resolved).await);
    assert_eq!(after.status, SiteStatus::Passed);
}

#[tokio::test]
async fn test_resolve_without_pending_change_resets_status_only() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    // Drive the site into Error without a latest blob.
    h.fetcher.fail("https://example.com");
    let errored = checked(h.checker.check_site(&site).await);
    assert_eq!(errored.status, SiteStatus::Error);

    let resolved = h.checker.resolve_site(&site.id).await.expect("resolve site");

    assert_eq!(resolved.status, SiteStatus::Passed);
    assert_eq!(resolved.baseline_fingerprint, site.baseline_fingerprint);
    assert_eq!(h.snapshots.baseline(&site.id), Some(PAGE_V1.to_string()));
}

#[tokio::test]
async fn test_resolve_unknown_site_is_not_found() {
    let h = harness();
    let result = h.checker.resolve_site(&SiteId::generate()).await;
    assert!(matches!(result, Err(CheckerError::SiteNotFound(_))));
}

#[tokio::test]
async fn test_add_site_fetch_failure_leaves_no_state() {
    let h = harness();
    h.fetcher.fail("https://example.com");

    let result = h.checker.add_site("https://example.com").await;
    assert!(matches!(result, Err(CheckerError::Fetch(_))));

    assert!(h.records.get_all().await.expect("get all").is_empty());
    assert!(h
        .snapshots
        .list_site_ids()
        .await
        .expect("list snapshot ids")
        .is_empty());
}

#[tokio::test]
async fn test_add_site_record_failure_cleans_up_baseline() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    h.records.fail_upserts(true);

    let result = h.checker.add_site("https://example.com").await;
    assert!(matches!(result, Err(CheckerError::Storage(_))));

    // The compensating delete removed the already-written baseline.
    assert!(h
        .snapshots
        .list_site_ids()
        .await
        .expect("list snapshot ids")
        .is_empty());
    assert!(h.records.get_all().await.expect("get all").is_empty());
}

#[tokio::test]
async fn test_storage_failure_leaves_stored_record_untouched() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    h.snapshots.fail_writes(true);

    let outcome = h.checker.check_site(&site).await;
    assert!(matches!(outcome, CheckOutcome::StorageFailed { .. }));
    assert_eq!(outcome.site().id, site.id);

    // The stored record still holds the pre-check state.
    let stored = h
        .records
        .get_by_id(&site.id)
        .await
        .expect("get record")
        .expect("record present");
    assert_eq!(stored.status, SiteStatus::Passed);
    assert_eq!(stored.last_checked_at, site.last_checked_at);
}

#[tokio::test]
async fn test_delete_site_removes_record_and_blobs() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    h.fetcher.serve("https://example.com", PAGE_V2);
    checked(h.checker.check_site(&site).await);

    h.checker.delete_site(&site.id).await.expect("delete site");

    assert!(h
        .records
        .get_by_id(&site.id)
        .await
        .expect("get record")
        .is_none());
    assert_eq!(h.snapshots.baseline(&site.id), None);
    assert_eq!(h.snapshots.latest(&site.id), None);
}

#[tokio::test]
async fn test_reconcile_sweeps_orphaned_blobs_only() {
    let h = harness();
    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    // Orphan: a baseline blob with no record, as left by a crash between
    // blob write and record creation.
    let orphan = SiteId::generate();
    h.snapshots
        .put_baseline(&orphan, "<html>orphan</html>")
        .await
        .expect("write orphan baseline");

    let removed = h.checker.reconcile_snapshots().await.expect("reconcile");

    assert_eq!(removed, 1);
    assert_eq!(h.snapshots.baseline(&orphan), None);
    assert_eq!(h.snapshots.baseline(&site.id), Some(PAGE_V1.to_string()));
}

#[tokio::test]
async fn test_record_watch_observes_lifecycle() {
    let h = harness();
    let mut rx = h.records.observe_all();
    assert!(rx.borrow().is_empty());

    h.fetcher.serve("https://example.com", PAGE_V1);
    let site = h.checker.add_site("https://example.com").await.expect("add site");

    rx.changed().await.expect("list update after add");
    assert_eq!(rx.borrow_and_update().len(), 1);

    h.checker.delete_site(&site.id).await.expect("delete site");
    rx.changed().await.expect("list update after delete");
    assert!(rx.borrow_and_update().is_empty());
}
