//! Same entries, same settings, same bytes.

use crate::common::*;

#[test]
fn identical_inputs_give_identical_archives() {
    let files = sample_files();
    let first = build_archive(&files, &fast());
    let second = build_archive(&files, &fast());
    assert_eq!(first, second);
    assert_eq!(Crc32::compute(&first), Crc32::compute(&second));
}

#[test]
fn sample_archive_size_is_stable_across_runs() {
    let files = sample_files();
    let sizes: Vec<usize> = (0..3).map(|_| build_archive(&files, &fast()).len()).collect();
    assert!(sizes.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn entry_order_changes_bytes() {
    let mut files = sample_files();
    let forward = build_archive(&files, &fast());
    files.reverse();
    let reversed = build_archive(&files, &fast());
    assert_ne!(forward, reversed);

    let names: Vec<String> = extract(&reversed).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["c", "b", "a"]);
}

#[test]
fn headers_carry_no_host_metadata() {
    let files = vec![("dir/file.bin".to_string(), vec![1u8; 10])];
    let archive = build_archive(&files, &fast());

    let mut tar = tar::Archive::new(xz2::read::XzDecoder::new(&archive[..]));
    for entry in tar.entries().unwrap() {
        let entry = entry.unwrap();
        let header = entry.header();
        assert_eq!(header.mtime().unwrap(), 0);
        assert_eq!(header.uid().unwrap(), 0);
        assert_eq!(header.gid().unwrap(), 0);
        assert_eq!(header.mode().unwrap(), 0o644);
    }
}

#[test]
fn empty_archive_is_valid() {
    let archive = build_archive(&[], &fast());
    assert!(!archive.is_empty());
    assert!(extract(&archive).is_empty());
}
