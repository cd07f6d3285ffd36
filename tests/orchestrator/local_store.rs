//! End to end against the filesystem store.

use crate::common::*;
use std::fs;
use tempfile::TempDir;

fn local_store_with_samples() -> (TempDir, LocalObjectStore) {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path()).unwrap().with_page_size(2);
    store.create_container(CONTAINER).unwrap();
    for (name, data) in sample_files() {
        let mut body = &data[..];
        store
            .write(CONTAINER, &format!("photos/{}", name), &mut body, "image/jpeg")
            .unwrap();
    }
    (dir, store)
}

#[test]
fn archives_directory_tree_and_cleans_up() {
    let (_dir, store) = local_store_with_samples();
    let scratch = TempDir::new().unwrap();
    let config = fast_config().with_temp_dir(scratch.path());
    let orchestrator = ArchiveOrchestrator::new(&store, config).unwrap();

    let response = orchestrator
        .run(
            &ArchiveRequest::new(CONTAINER, "archives/photos.tar.xz")
                .with_prefix("photos/")
                .with_delete_after_archive(true),
        )
        .unwrap();
    assert_eq!(response.input_object_count, 3);
    assert!(response.deleted_inputs);

    let archive_path = store
        .object_path(CONTAINER, "archives/photos.tar.xz")
        .unwrap();
    let archive = fs::read(archive_path).unwrap();
    assert_eq!(response.checksum_crc32, Crc32::compute(&archive).encode());
    assert_eq!(extract(&archive).len(), 3);

    let remaining: Vec<String> = store
        .list(CONTAINER, None)
        .map(|r| r.unwrap().key)
        .collect();
    assert_eq!(remaining, vec!["archives/photos.tar.xz"]);
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn rejects_escaping_output_key() {
    let (_dir, store) = local_store_with_samples();
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();

    let err = orchestrator
        .run(
            &ArchiveRequest::new(CONTAINER, "../escape.tar.xz")
                .with_prefix("photos/")
                .with_delete_after_archive(true),
        )
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Uploading);
    assert_eq!(err.kind(), ErrorKind::Config);

    let remaining = store.list(CONTAINER, Some("photos/")).count();
    assert_eq!(remaining, 3);
}
