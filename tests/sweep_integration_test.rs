//! End-to-end sweeps against in-memory storage.

mod common;

use bucket_sweep::adapters::InMemoryStorage;
use bucket_sweep::domain::models::{DeletionOutcome, FolderStatus, StorageUri};
use bucket_sweep::services::{BucketSweeper, SweepOptions};
use bucket_sweep::SweepError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

/// `myb` with a release folder, a 15-day-old build folder and an archive.
fn release_bucket() -> InMemoryStorage {
    InMemoryStorage::default()
        .with_object_at("myb", "v1.2.3/app.bin", ago(400))
        .with_object_at("myb", "abc123/app.bin", ago(15))
        .with_object_at("myb", "nightly.tar", ago(90))
}

fn sweeper(storage: Arc<InMemoryStorage>, retention_days: u32, delete: bool) -> BucketSweeper {
    BucketSweeper::new(
        storage,
        SweepOptions {
            retention_days,
            delete,
            max_concurrent_folders: 1,
        },
    )
}

#[tokio::test]
async fn test_folder_older_than_threshold_is_reported() {
    common::setup_test_logging();
    let storage = Arc::new(release_bucket());

    let report = sweeper(storage.clone(), 10, false)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.threshold_days, 10);
    assert_eq!(report.preserved, vec!["v1.2.3".to_string()]);
    assert_eq!(report.archives_skipped, 1);
    assert_eq!(report.folders.len(), 1);

    let folder = &report.folders[0];
    assert_eq!(folder.folder, "abc123");
    assert_eq!(folder.status, FolderStatus::Eligible);
    assert_eq!(folder.age_days(), Some(15));
    assert!(storage.delete_calls().await.is_empty());
}

#[tokio::test]
async fn test_wider_window_keeps_folder() {
    let storage = Arc::new(release_bucket());

    let report = sweeper(storage, 20, false)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert_eq!(report.folders.len(), 1);
    assert_eq!(report.folders[0].status, FolderStatus::Keep);
    assert_eq!(report.eligible().count(), 0);
}

#[tokio::test]
async fn test_release_folder_is_never_listed_or_deleted() {
    let storage = Arc::new(release_bucket());

    sweeper(storage.clone(), 0, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    let listed = storage.list_calls().await;
    assert!(!listed.contains(&StorageUri::folder("gs", "myb", "v1.2.3")));
    assert!(!storage
        .delete_calls()
        .await
        .contains(&StorageUri::folder("gs", "myb", "v1.2.3")));
    assert!(storage
        .object_paths()
        .await
        .contains(&"gs://myb/v1.2.3/app.bin".to_string()));
}

#[tokio::test]
async fn test_delete_mode_removes_eligible_folder_once() {
    let storage = Arc::new(release_bucket());

    let report = sweeper(storage.clone(), 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert!(!report.dry_run);
    assert_eq!(report.folders[0].status, FolderStatus::Deleted);
    assert_eq!(report.folders[0].deletion, Some(DeletionOutcome::Deleted));
    assert_eq!(
        storage.delete_calls().await,
        vec![StorageUri::folder("gs", "myb", "abc123")]
    );
    assert_eq!(report.exit_code(), 0);

    let remaining = storage.object_paths().await;
    assert!(remaining.iter().all(|p| !p.starts_with("gs://myb/abc123/")));
}

#[tokio::test]
async fn test_unparseable_timestamp_does_not_block_eligibility() {
    let storage = Arc::new(
        InMemoryStorage::default()
            .with_object("myb", "def456/a-broken.log", "not-a-date")
            .with_object_at("myb", "def456/b-old.log", ago(30)),
    );

    let report = sweeper(storage, 10, false)
        .sweep_at("myb", now())
        .await
        .unwrap();

    let folder = &report.folders[0];
    assert_eq!(folder.status, FolderStatus::Eligible);
    assert_eq!(folder.age_days(), Some(30));
    let decision = folder.decision.as_ref().unwrap();
    assert_eq!(decision.entries_skipped, 1);
    assert_eq!(decision.entries_inspected, 1);
}

#[tokio::test]
async fn test_only_nested_folders_means_keep() {
    let storage = Arc::new(
        InMemoryStorage::default().with_object_at("myb", "ghi789/deeper/old.log", ago(300)),
    );

    let report = sweeper(storage.clone(), 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert_eq!(report.folders[0].status, FolderStatus::Keep);
    assert_eq!(report.folders[0].age_days(), None);
    assert!(storage.delete_calls().await.is_empty());
}

#[tokio::test]
async fn test_failed_deletion_continues_and_sets_exit_code() {
    let storage = Arc::new(
        InMemoryStorage::default()
            .with_object_at("myb", "aaa/old.log", ago(40))
            .with_object_at("myb", "bbb/old.log", ago(40))
            .with_object_at("myb", "ccc/old.log", ago(40))
            .with_delete_failure("gs://myb/aaa/", Some(3), "AccessDeniedException: 403")
            .with_delete_failure("gs://myb/bbb/", Some(7), "ServiceException: 503"),
    );

    let report = sweeper(storage.clone(), 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    let statuses: Vec<FolderStatus> = report.folders.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![
            FolderStatus::DeleteFailed,
            FolderStatus::DeleteFailed,
            FolderStatus::Deleted
        ]
    );
    assert_eq!(storage.delete_calls().await.len(), 3);
    assert_eq!(report.exit_code(), 3);

    match &report.folders[0].deletion {
        Some(DeletionOutcome::Failed { exit_code, message }) => {
            assert_eq!(*exit_code, Some(3));
            assert!(message.contains("AccessDenied"));
        }
        other => panic!("expected failed deletion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_deletion_without_status_exits_one() {
    let storage = Arc::new(
        InMemoryStorage::default()
            .with_object_at("myb", "aaa/old.log", ago(40))
            .with_delete_failure("gs://myb/aaa/", None, "killed"),
    );

    let report = sweeper(storage, 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_folder_listing_failure_is_recorded_and_sweep_continues() {
    let storage = Arc::new(
        InMemoryStorage::default()
            .with_object_at("myb", "aaa/old.log", ago(40))
            .with_object_at("myb", "bbb/old.log", ago(40))
            .with_list_failure("gs://myb/aaa/", "AccessDeniedException: 403"),
    );

    let report = sweeper(storage.clone(), 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert_eq!(report.folders[0].status, FolderStatus::ListFailed);
    assert!(report.folders[0]
        .listing_error
        .as_deref()
        .unwrap()
        .contains("AccessDenied"));
    assert_eq!(report.folders[1].status, FolderStatus::Deleted);
    assert_eq!(
        storage.delete_calls().await,
        vec![StorageUri::folder("gs", "myb", "bbb")]
    );
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_root_listing_failure_yields_empty_report() {
    let storage = Arc::new(
        release_bucket().with_list_failure("gs://myb/", "BucketNotFoundException: 404"),
    );

    let report = sweeper(storage.clone(), 10, true)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert!(report.folders.is_empty());
    assert!(report
        .root_listing_error
        .as_deref()
        .unwrap()
        .contains("BucketNotFound"));
    assert_eq!(storage.list_calls().await.len(), 1);
    assert!(storage.delete_calls().await.is_empty());
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_blank_bucket_is_rejected_before_listing() {
    let storage = Arc::new(release_bucket());

    for bucket in ["", "   "] {
        let err = sweeper(storage.clone(), 10, true)
            .sweep_at(bucket, now())
            .await
            .unwrap_err();
        assert!(matches!(err, SweepError::MissingBucket));
    }

    assert!(storage.list_calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_bucket_reports_nothing() {
    let storage = Arc::new(InMemoryStorage::default());

    let report = sweeper(storage, 10, true)
        .sweep_at("empty", now())
        .await
        .unwrap();

    assert!(report.folders.is_empty());
    assert!(report.preserved.is_empty());
    assert!(report.root_listing_error.is_none());
}

#[tokio::test]
async fn test_concurrent_sweep_matches_sequential_order() {
    let build = || {
        let mut storage = InMemoryStorage::default();
        for (i, days) in [3, 25, 11, 9, 60, 10, 12, 1].iter().enumerate() {
            storage = storage.with_object_at("myb", &format!("build-{i:02}/out.bin"), ago(*days));
        }
        Arc::new(storage)
    };

    let sequential = sweeper(build(), 10, false)
        .sweep_at("myb", now())
        .await
        .unwrap();

    let concurrent = BucketSweeper::new(
        build(),
        SweepOptions {
            retention_days: 10,
            delete: false,
            max_concurrent_folders: 4,
        },
    )
    .sweep_at("myb", now())
    .await
    .unwrap();

    let summary = |r: &bucket_sweep::SweepReport| -> Vec<(String, FolderStatus)> {
        r.folders.iter().map(|f| (f.folder.clone(), f.status)).collect()
    };
    assert_eq!(summary(&sequential), summary(&concurrent));

    let eligible: Vec<&str> = concurrent.eligible().map(|f| f.folder.as_str()).collect();
    assert_eq!(eligible, vec!["build-01", "build-02", "build-04", "build-06"]);
}

#[tokio::test]
async fn test_exactly_threshold_days_is_kept() {
    let storage = Arc::new(InMemoryStorage::default().with_object_at("myb", "edge/out.bin", ago(10)));

    let report = sweeper(storage, 10, false)
        .sweep_at("myb", now())
        .await
        .unwrap();

    assert_eq!(report.folders[0].status, FolderStatus::Keep);
    assert_eq!(report.folders[0].age_days(), Some(10));
}
