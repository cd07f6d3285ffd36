//! The three-photo archive: sizes, contents and checksums survive.

use crate::common::*;
use xzbundle::TAR_XZ_CONTENT_TYPE;

#[test]
fn sample_files_extract_with_original_sizes() {
    let files = sample_files();
    let archive = build_archive(&files, &fast());

    let extracted = extract(&archive);
    let sizes: Vec<(String, usize)> = extracted
        .iter()
        .map(|(name, data)| (name.clone(), data.len()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("a".to_string(), 87940),
            ("b".to_string(), 46008),
            ("c".to_string(), 83694)
        ]
    );
}

#[test]
fn sample_files_keep_per_file_checksums() {
    let files = sample_files();
    let archive = build_archive(&files, &fast());

    for ((name, original), (extracted_name, extracted)) in files.iter().zip(extract(&archive)) {
        assert_eq!(name, &extracted_name);
        assert_eq!(Crc32::compute(original), Crc32::compute(&extracted));
    }
}

#[test]
fn result_describes_written_bytes() {
    let files = sample_files();
    let mut writer = ArchiveWriter::new(Vec::new(), &fast()).unwrap();
    for (name, data) in &files {
        writer.put_entry(name, data.len() as u64, &data[..]).unwrap();
    }
    let (result, archive) = writer.finish().unwrap();

    assert_eq!(result.byte_size, archive.len() as u64);
    assert_eq!(result.checksum, Crc32::compute(&archive));
    assert_eq!(result.entry_count, 3);
    assert_eq!(result.input_bytes, 87940 + 46008 + 83694);
    assert_eq!(result.encoded_checksum().len(), 8);
}

#[test]
fn default_level_archive_is_readable() {
    let files = sample_files();
    let archive = build_archive(&files, &ArchiveOptions::default());
    assert_eq!(extract(&archive), files);
}

#[test]
fn content_type_matches_upload_default() {
    assert_eq!(TAR_XZ_CONTENT_TYPE, "application/tar+xz");
    assert_eq!(BundleConfig::default().content_type, TAR_XZ_CONTENT_TYPE);
}
