//! Sources survive every failed run.

use crate::common::*;
use xzbundle::ArchiveFailure;

fn request() -> ArchiveRequest {
    ArchiveRequest::new(CONTAINER, "photos.tar.xz")
        .with_prefix("photos/")
        .with_delete_after_archive(true)
}

fn assert_sources_kept(store: &MemoryObjectStore) {
    for (name, data) in sample_files() {
        assert_eq!(
            store.get(CONTAINER, &format!("photos/{}", name)).as_deref(),
            Some(&data[..])
        );
    }
}

#[test]
fn checksum_mismatch_keeps_sources_and_reports_both_values() {
    let mut store = InstrumentedStore::new(seeded_store("photos/", &sample_files()));
    store.corrupt_checksum = true;

    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    let err = orchestrator.run(&request()).unwrap_err();

    assert_eq!(store.delete_call_count(), 0);
    assert_sources_kept(&store.inner);

    let report = ArchiveFailure::from_error(&err);
    assert_eq!(report.stage, Stage::Verifying);
    assert_eq!(report.kind, ErrorKind::Integrity);
    assert!(!report.deleted_inputs);
    let local = report.local_checksum.unwrap();
    let remote = report.remote_checksum.unwrap();
    assert_ne!(local, remote);
    assert_eq!(local.len(), 8);
    assert_eq!(remote.len(), 8);
}

#[test]
fn failed_read_aborts_before_upload() {
    let mut store = InstrumentedStore::new(seeded_store("photos/", &sample_files()));
    store.fail_read_of = Some("photos/b".to_string());

    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    let err = orchestrator.run(&request()).unwrap_err();

    assert_eq!(err.stage(), Stage::Archiving);
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("photos/b"));
    assert_eq!(store.upload_count(), 0);
    assert_eq!(store.delete_call_count(), 0);
    assert!(!store.inner.contains(CONTAINER, "photos.tar.xz"));
}

#[test]
fn truncated_source_is_integrity_failure() {
    let mut store = InstrumentedStore::new(seeded_store("photos/", &sample_files()));
    store.truncate_read_of = Some("photos/c".to_string());

    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    let err = orchestrator.run(&request()).unwrap_err();

    assert_eq!(err.stage(), Stage::Archiving);
    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert_eq!(store.upload_count(), 0);
    assert_sources_kept(&store.inner);
}

#[test]
fn failed_upload_keeps_sources() {
    let mut store = InstrumentedStore::new(seeded_store("photos/", &sample_files()));
    store.fail_upload = true;

    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    let err = orchestrator.run(&request()).unwrap_err();

    assert_eq!(err.stage(), Stage::Uploading);
    assert_eq!(store.delete_call_count(), 0);
    assert_sources_kept(&store.inner);
}

#[test]
fn verified_upload_deletes_every_source_once() {
    let store = InstrumentedStore::new(seeded_store("photos/", &sample_files()));
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();

    let response = orchestrator.run(&request()).unwrap();
    assert!(response.deleted_inputs);

    let deleted: Vec<String> = store.delete_calls.lock().concat();
    assert_eq!(deleted, vec!["photos/a", "photos/b", "photos/c"]);
    assert_eq!(store.inner.keys(CONTAINER), vec!["photos.tar.xz"]);
}
