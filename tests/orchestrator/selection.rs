//! What ends up in the archive, and what the response says about it.

use crate::common::*;

#[test]
fn response_counts_match_listing() {
    let files = sample_files();
    let store = seeded_store("in/", &files);
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();

    let response = orchestrator
        .run(&ArchiveRequest::new(CONTAINER, "out.tar.xz").with_prefix("in/"))
        .unwrap();

    assert_eq!(response.input_object_count, 3);
    assert_eq!(response.input_byte_size, 87940 + 46008 + 83694);
    assert!(!response.deleted_inputs);

    let archive = store.get(CONTAINER, "out.tar.xz").unwrap();
    assert_eq!(response.output_byte_size, archive.len() as u64);
    assert_eq!(response.checksum_crc32, Crc32::compute(&archive).encode());

    let extracted = extract(&archive);
    let names: Vec<&str> = extracted.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["in/a", "in/b", "in/c"]);
    for ((_, original), (_, data)) in files.iter().zip(&extracted) {
        assert_eq!(original, data);
    }
}

#[test]
fn archive_matches_direct_build() {
    let files = sample_files();
    let store = seeded_store("", &files);
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    orchestrator
        .run(&ArchiveRequest::new(CONTAINER, "out.tar.xz"))
        .unwrap();

    let uploaded = store.get(CONTAINER, "out.tar.xz").unwrap();
    assert_eq!(uploaded, build_archive(&files, &fast()));
}

#[test]
fn empty_prefix_gives_empty_archive() {
    let store = seeded_store("in/", &sample_files());
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();

    let response = orchestrator
        .run(
            &ArchiveRequest::new(CONTAINER, "nothing.tar.xz")
                .with_prefix("missing/")
                .with_delete_after_archive(true),
        )
        .unwrap();
    assert_eq!(response.input_object_count, 0);
    assert_eq!(response.input_byte_size, 0);
    assert!(extract(&store.get(CONTAINER, "nothing.tar.xz").unwrap()).is_empty());
    assert_eq!(store.keys(CONTAINER).len(), 4);
}

#[test]
fn legacy_request_selects_files() {
    let store = seeded_store("in/", &sample_files());
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();
    let request = ArchiveRequest::from_json(
        r#"{
            "bucketName": "bucket",
            "folder": "in/",
            "files": ["in/c", "in/a"],
            "outputFileName": "two.tar.xz",
            "deleteAfterCompress": true
        }"#,
    )
    .unwrap();

    let response = orchestrator.run(&request).unwrap();
    assert_eq!(response.input_object_count, 2);
    assert!(response.deleted_inputs);
    assert_eq!(store.keys(CONTAINER), vec!["in/b", "two.tar.xz"]);
}

#[test]
fn missing_selected_key_uploads_nothing() {
    let store = InstrumentedStore::new(seeded_store("in/", &sample_files()));
    let orchestrator = ArchiveOrchestrator::new(&store, fast_config()).unwrap();

    let err = orchestrator
        .run(&ArchiveRequest::new(CONTAINER, "out.tar.xz").with_keys(["in/a", "in/zzz"]))
        .unwrap_err();
    assert!(matches!(err, BundleError::MissingKeys(_)));
    assert_eq!(err.stage(), Stage::Listing);
    assert_eq!(store.upload_count(), 0);
}
