//! One archive run from listing to cleanup
//!
//! Sources are streamed one at a time into an [`ArchiveWriter`] backed by a
//! temporary file. The archive is uploaded only after every entry landed,
//! and sources are deleted only after the store's checksum of the upload
//! matches the local one. Any error ends the run with nothing deleted; the
//! temporary file is removed on every exit path.

use crate::config::BundleConfig;
use crate::error::{BundleError, BundleResult};
use crate::request::{ArchiveRequest, ArchiveResponse};
use std::collections::HashSet;
use std::io::{BufReader, BufWriter};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use xzbundle_archive::{ArchiveResult, ArchiveWriter, TAR_XZ_EXTENSION};
use xzbundle_core::Stage;
use xzbundle_storage::{DeleteReport, ObjectListing, ObjectStore, ObjectSummary};

const TARGET: &str = "xzbundle::orchestrator";

/// Runs archive requests against one store
pub struct ArchiveOrchestrator<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    config: BundleConfig,
}

/// Sources chosen for one run
struct Selection {
    objects: Vec<ObjectSummary>,
    total_bytes: u64,
}

impl<'a, S: ObjectStore + ?Sized> ArchiveOrchestrator<'a, S> {
    /// Create an orchestrator; fails on invalid configuration
    pub fn new(store: &'a S, config: BundleConfig) -> BundleResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Configuration in effect
    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Archive, upload, verify and optionally delete
    pub fn run(&self, request: &ArchiveRequest) -> BundleResult<ArchiveResponse> {
        request.validate()?;

        enter(Stage::Listing, request);
        let selection = self.select(request)?;
        info!(
            target: TARGET,
            objects = selection.objects.len(),
            bytes = selection.total_bytes,
            "Listing complete"
        );

        enter(Stage::Archiving, request);
        let (staging, archive) = self.build_archive(request, &selection.objects)?;

        enter(Stage::Uploading, request);
        let remote = self.upload(request, &staging)?;
        drop(staging);

        enter(Stage::Verifying, request);
        let local = archive.encoded_checksum();
        if remote.checksum_crc32 != local {
            warn!(
                target: TARGET,
                output = %request.output_name,
                local = %local,
                remote = %remote.checksum_crc32,
                "Checksum mismatch, sources kept"
            );
            return Err(BundleError::ChecksumMismatch {
                key: request.output_name.clone(),
                local,
                remote: remote.checksum_crc32,
            });
        }
        if remote.size != archive.byte_size {
            warn!(
                target: TARGET,
                local = archive.byte_size,
                remote = remote.size,
                "Store reported a different size for a matching checksum"
            );
        }

        let deleted_inputs = if request.delete_after_archive {
            enter(Stage::Cleaning, request);
            let keys: Vec<String> = selection.objects.iter().map(|o| o.key.clone()).collect();
            self.delete_sources(request, &keys)
        } else {
            false
        };

        enter(Stage::Done, request);
        Ok(ArchiveResponse {
            output_name: request.output_name.clone(),
            output_byte_size: remote.size,
            checksum_crc32: local,
            input_object_count: selection.objects.len() as u64,
            input_byte_size: selection.total_bytes,
            deleted_inputs,
        })
    }

    /// List sources, honoring an explicit key selection
    fn select(&self, request: &ArchiveRequest) -> BundleResult<Selection> {
        let container = request.container_name.as_str();
        let wanted: HashSet<&str> = request.keys.iter().map(String::as_str).collect();
        let mut found = HashSet::new();
        let mut objects = Vec::new();

        for item in ObjectListing::new(self.store, container, request.prefix.as_deref()) {
            let object = item.map_err(|e| {
                let target = match &request.prefix {
                    Some(prefix) => format!("{}/{}", container, prefix),
                    None => container.to_string(),
                };
                BundleError::storage(Stage::Listing, target, e)
            })?;

            // Never archive (and later delete) the archive being produced.
            if object.key == request.output_name {
                debug!(target: TARGET, key = %object.key, "Skipping output key in listing");
                continue;
            }
            if !wanted.is_empty() {
                if !wanted.contains(object.key.as_str()) {
                    continue;
                }
                found.insert(object.key.clone());
            }
            debug!(target: TARGET, key = %object.key, size = object.size, "Selected object");
            objects.push(object);
        }

        if !wanted.is_empty() {
            let mut missing: Vec<String> = request
                .keys
                .iter()
                .filter(|k| !found.contains(k.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                missing.sort();
                missing.dedup();
                return Err(BundleError::MissingKeys(missing));
            }
        }

        let total_bytes = objects.iter().map(|o| o.size).sum();
        Ok(Selection {
            objects,
            total_bytes,
        })
    }

    fn staging_file(&self) -> BundleResult<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("xzbundle-").suffix(TAR_XZ_EXTENSION);
        let file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        file.map_err(BundleError::TempFile)
    }

    /// Stream every source into a temporary archive
    fn build_archive(
        &self,
        request: &ArchiveRequest,
        objects: &[ObjectSummary],
    ) -> BundleResult<(NamedTempFile, ArchiveResult)> {
        let container = request.container_name.as_str();
        let output = request.output_name.as_str();
        let mut staging = self.staging_file()?;
        debug!(target: TARGET, path = %staging.path().display(), "Created temporary archive");

        let sink = BufWriter::new(staging.as_file_mut());
        let mut writer = ArchiveWriter::new(sink, &self.config.archive_options())
            .map_err(|e| BundleError::archive(Stage::Archiving, output, e))?;

        for object in objects {
            let body = self
                .store
                .read(container, &object.key)
                .map_err(|e| BundleError::storage(Stage::Archiving, object.key.as_str(), e))?;
            writer
                .put_entry(&object.key, object.size, body)
                .map_err(|e| BundleError::archive(Stage::Archiving, object.key.as_str(), e))?;
            debug!(target: TARGET, key = %object.key, size = object.size, "Archived object");
        }

        // The buffered sink borrows the temp file; drop it with the writer.
        let (archive, _) = writer
            .finish()
            .map_err(|e| BundleError::archive(Stage::Archiving, output, e))?;
        info!(
            target: TARGET,
            entries = archive.entry_count,
            input_bytes = archive.input_bytes,
            bytes = archive.byte_size,
            checksum = %archive.checksum,
            "Archive complete"
        );
        Ok((staging, archive))
    }

    fn upload(
        &self,
        request: &ArchiveRequest,
        staging: &NamedTempFile,
    ) -> BundleResult<xzbundle_storage::PutReceipt> {
        let file = staging.reopen().map_err(BundleError::TempFile)?;
        let mut body = BufReader::new(file);
        let receipt = self
            .store
            .write(
                &request.container_name,
                &request.output_name,
                &mut body,
                &self.config.content_type,
            )
            .map_err(|e| BundleError::storage(Stage::Uploading, request.output_name.as_str(), e))?;
        info!(
            target: TARGET,
            container = %request.container_name,
            output = %request.output_name,
            bytes = receipt.size,
            "Uploaded archive"
        );
        Ok(receipt)
    }

    /// Delete in batches; true only when every key was removed
    fn delete_sources(&self, request: &ArchiveRequest, keys: &[String]) -> bool {
        let container = request.container_name.as_str();
        let mut report = DeleteReport::default();
        let mut complete = true;

        for batch in keys.chunks(self.config.delete_batch_size) {
            match self.store.delete_many(container, batch) {
                Ok(batch_report) => report.merge(batch_report),
                Err(e) => {
                    warn!(
                        target: TARGET,
                        container,
                        keys = batch.len(),
                        error = %e,
                        "Bulk delete failed"
                    );
                    complete = false;
                }
            }
        }
        for failure in &report.failed {
            warn!(
                target: TARGET,
                key = %failure.key,
                reason = %failure.reason,
                "Source not deleted"
            );
        }

        info!(
            target: TARGET,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Cleanup complete"
        );
        complete && report.is_complete()
    }
}

fn enter(stage: Stage, request: &ArchiveRequest) {
    debug!(
        target: TARGET,
        stage = %stage,
        output = %request.output_name,
        "Entering stage"
    );
}
