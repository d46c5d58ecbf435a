//! Target selection and auto-hash policy tests

use filehash_core::algorithm::Algorithm;
use filehash_core::policy::{AutohashTracker, autohash_candidates, select_targets};
use filehash_core::settings::Settings;
use filehash_core::store::{FileDescriptor, FileStatus};
use filehash_test_utils::MockDigestStore;

fn two_algo_settings() -> Settings {
    Settings {
        algorithms: vec!["sha1".to_string(), "sha256".to_string()],
        ..Settings::default()
    }
}

fn file(id: i64) -> FileDescriptor {
    FileDescriptor::new(id, format!("/uploads/{id}.bin"))
}

#[tokio::test]
async fn test_missing_only_selection() {
    let settings = two_algo_settings();
    let store = MockDigestStore::new();
    store.seed(1, Algorithm::Sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");

    let targets = select_targets(&file(1), &settings, &store).await.unwrap();
    assert_eq!(targets, vec![Algorithm::Sha256]);
}

#[tokio::test]
async fn test_nothing_selected_when_all_present() {
    let settings = two_algo_settings();
    let store = MockDigestStore::new();
    store.seed(1, Algorithm::Sha1, "aa");
    store.seed(1, Algorithm::Sha256, "bb");

    let targets = select_targets(&file(1), &settings, &store).await.unwrap();
    assert!(targets.is_empty());
}

#[tokio::test]
async fn test_rehash_selects_full_enabled_set() {
    let settings = Settings {
        rehash: true,
        ..two_algo_settings()
    };
    let store = MockDigestStore::new();
    store.seed(1, Algorithm::Sha1, "aa");
    store.seed(1, Algorithm::Sha256, "bb");

    let targets = select_targets(&file(1), &settings, &store).await.unwrap();
    assert_eq!(targets, vec![Algorithm::Sha1, Algorithm::Sha256]);
}

#[tokio::test]
async fn test_autohash_selects_files_missing_digests() {
    let settings = Settings {
        autohash: true,
        ..two_algo_settings()
    };
    let store = MockDigestStore::new();
    store.seed(1, Algorithm::Sha1, "aa");
    store.seed(1, Algorithm::Sha256, "bb");
    store.seed(2, Algorithm::Sha1, "cc");
    // File 2 is missing sha256; file 3 has nothing.

    let files = [file(1), file(2), file(3)];
    let mut tracker = AutohashTracker::new();
    let candidates = autohash_candidates(&files, &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert_eq!(candidates, vec![2, 3]);
}

#[tokio::test]
async fn test_autohash_marks_each_file_once_per_run() {
    let settings = Settings {
        autohash: true,
        ..two_algo_settings()
    };
    let store = MockDigestStore::new();
    let files = [file(5)];
    let mut tracker = AutohashTracker::new();

    let first = autohash_candidates(&files, &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert_eq!(first, vec![5]);

    // The save triggered by the first pass reloads the file; the marker
    // keeps the second load from scheduling it again.
    let second = autohash_candidates(&files, &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert!(second.is_empty());

    // A fresh run starts over.
    tracker.reset();
    let third = autohash_candidates(&files, &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert_eq!(third, vec![5]);
}

#[tokio::test]
async fn test_autohash_disabled_returns_nothing() {
    let settings = two_algo_settings();
    let store = MockDigestStore::new();
    let mut tracker = AutohashTracker::new();

    let candidates = autohash_candidates(&[file(1)], &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert!(candidates.is_empty());
    assert!(!tracker.attempted(1));
}

#[tokio::test]
async fn test_autohash_skips_files_that_should_not_hash() {
    let settings = Settings {
        autohash: true,
        mime_types: vec!["image/png".to_string()],
        ..two_algo_settings()
    };
    let store = MockDigestStore::new();
    let files = [
        FileDescriptor::new(1, "/uploads/1.txt").with_mime_type("text/plain"),
        FileDescriptor::new(2, "/uploads/2.png")
            .with_mime_type("image/png")
            .with_status(FileStatus::Permanent),
    ];
    let mut tracker = AutohashTracker::new();

    let candidates = autohash_candidates(&files, &settings, &store, &mut tracker)
        .await
        .unwrap();
    assert_eq!(candidates, vec![2]);
}
