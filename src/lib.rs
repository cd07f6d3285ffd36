//! xzbundle - bundle stored objects into one verified tar.xz archive
//!
//! A run lists objects under a container and prefix, streams each one into a
//! tar archive compressed with xz, uploads the archive, and deletes the
//! sources only when the store's CRC-32 of the upload matches the CRC-32
//! computed while writing it.
//!
//! # Quick Start
//!
//! ```ignore
//! use xzbundle::{ArchiveOrchestrator, ArchiveRequest, BundleConfig, LocalObjectStore};
//!
//! let store = LocalObjectStore::new("/srv/objects")?;
//! let orchestrator = ArchiveOrchestrator::new(&store, BundleConfig::default())?;
//! let response = orchestrator.run(
//!     &ArchiveRequest::new("photos", "2023.tar.xz")
//!         .with_prefix("2023/")
//!         .with_delete_after_archive(true),
//! )?;
//! println!("{} objects -> {} bytes", response.input_object_count, response.output_byte_size);
//! ```
//!
//! # Layers
//!
//! - `xzbundle-core`: checksum encoding, error kinds, run stages
//! - `xzbundle-archive`: [`ArchiveWriter`] over xz and CRC-32 sinks
//! - `xzbundle-storage`: the [`ObjectStore`] contract and its backends
//! - `xzbundle-engine`: configuration, requests and the orchestrator

pub use xzbundle_archive::{
    ArchiveError, ArchiveOptions, ArchiveResult, ArchiveWriteResult, ArchiveWriter,
    ChecksummingSink, CompressingSink, TAR_XZ_CONTENT_TYPE, TAR_XZ_EXTENSION,
};
pub use xzbundle_core::{ChecksumDecodeError, Crc32, ErrorKind, Stage};
pub use xzbundle_engine::{
    ArchiveFailure, ArchiveOrchestrator, ArchiveRequest, ArchiveResponse, BundleConfig,
    BundleError, BundleResult, ConfigError,
};
pub use xzbundle_storage::{
    DeleteReport, ListPage, LocalObjectStore, MemoryObjectStore, ObjectListing, ObjectStore,
    ObjectSummary, PutReceipt, StoreError, StoreResult,
};
