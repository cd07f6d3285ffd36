//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
pub use xzbundle::{
    ArchiveOptions, ArchiveOrchestrator, ArchiveRequest, ArchiveWriter, BundleConfig,
    BundleError, Crc32, DeleteReport, ErrorKind, ListPage, LocalObjectStore, MemoryObjectStore,
    ObjectStore, PutReceipt, Stage, StoreError, StoreResult,
};

/// Container used by every suite
pub const CONTAINER: &str = "bucket";

/// Sizes of the three sample photos the archive is checked against
pub const SAMPLE_SIZES: [(&str, usize); 3] = [("a", 87940), ("b", 46008), ("c", 83694)];

// ============================================================================
// Data
// ============================================================================

/// Deterministic bytes for a named sample
pub fn sample_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

/// The three sample files as `(name, bytes)`
pub fn sample_files() -> Vec<(String, Vec<u8>)> {
    SAMPLE_SIZES
        .iter()
        .enumerate()
        .map(|(i, (name, len))| (name.to_string(), sample_bytes(i as u64 + 1, *len)))
        .collect()
}

/// Fast settings; level 9 needs hundreds of MiB per encoder
pub fn fast() -> ArchiveOptions {
    ArchiveOptions::new().with_compression_level(1)
}

/// Fast engine config
pub fn fast_config() -> BundleConfig {
    BundleConfig::new().with_compression_level(1)
}

// ============================================================================
// Archives
// ============================================================================

/// Build an archive in memory from `(name, bytes)` pairs
pub fn build_archive(files: &[(String, Vec<u8>)], options: &ArchiveOptions) -> Vec<u8> {
    let mut writer = ArchiveWriter::new(Vec::new(), options).unwrap();
    for (name, data) in files {
        writer.put_entry(name, data.len() as u64, &data[..]).unwrap();
    }
    let (_, out) = writer.finish().unwrap();
    out
}

/// Decode with the standard xz and tar readers into `(name, bytes)` pairs
pub fn extract(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut tar = tar::Archive::new(xz2::read::XzDecoder::new(archive));
    tar.entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (name, data)
        })
        .collect()
}

// ============================================================================
// Stores
// ============================================================================

/// Memory store holding `files` under `prefix`
pub fn seeded_store(prefix: &str, files: &[(String, Vec<u8>)]) -> MemoryObjectStore {
    let store = MemoryObjectStore::new().with_page_size(2);
    store.create_container(CONTAINER);
    for (name, data) in files {
        store.insert(CONTAINER, &format!("{}{}", prefix, name), data.clone());
    }
    store
}

/// Store wrapper that can misreport upload checksums, fail reads or
/// deletes, and records every call that mutates state.
pub struct InstrumentedStore<S> {
    pub inner: S,
    pub corrupt_checksum: bool,
    pub fail_read_of: Option<String>,
    pub truncate_read_of: Option<String>,
    pub fail_upload: bool,
    pub delete_calls: Mutex<Vec<Vec<String>>>,
    pub uploads: AtomicUsize,
}

impl<S: ObjectStore> InstrumentedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            corrupt_checksum: false,
            fail_read_of: None,
            truncate_read_of: None,
            fail_upload: false,
            delete_calls: Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_calls.lock().len()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

impl<S: ObjectStore> ObjectStore for InstrumentedStore<S> {
    fn list_page(
        &self,
        container: &str,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        self.inner.list_page(container, prefix, continuation)
    }

    fn read(&self, container: &str, key: &str) -> StoreResult<Box<dyn Read + Send + '_>> {
        if self.fail_read_of.as_deref() == Some(key) {
            return Err(StoreError::backend("read refused"));
        }
        let body = self.inner.read(container, key)?;
        if self.truncate_read_of.as_deref() == Some(key) {
            // Half the object, then a clean end of stream
            let mut data = Vec::new();
            let mut body = body;
            body.read_to_end(&mut data)?;
            data.truncate(data.len() / 2);
            return Ok(Box::new(std::io::Cursor::new(data)));
        }
        Ok(body)
    }

    fn write(
        &self,
        container: &str,
        key: &str,
        body: &mut dyn Read,
        content_type: &str,
    ) -> StoreResult<PutReceipt> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(StoreError::backend("service unavailable"));
        }
        let mut receipt = self.inner.write(container, key, body, content_type)?;
        if self.corrupt_checksum {
            let value = Crc32::decode(&receipt.checksum_crc32)
                .map_err(|e| StoreError::backend(e.to_string()))?
                .value();
            receipt.checksum_crc32 = Crc32::new(!value).encode();
        }
        Ok(receipt)
    }

    fn delete_many(&self, container: &str, keys: &[String]) -> StoreResult<DeleteReport> {
        self.delete_calls.lock().push(keys.to_vec());
        self.inner.delete_many(container, keys)
    }
}
