//! Archive run orchestration for xzbundle
//!
//! This crate ties the archive pipeline to an object store:
//! - [`ArchiveOrchestrator`]: list, archive, upload, verify, delete
//! - [`BundleConfig`]: settings loaded from `xzbundle.toml`
//! - [`ArchiveRequest`] / [`ArchiveResponse`]: JSON trigger input and output
//! - [`ArchiveFailure`]: structured report for a failed run
//!
//! Sources are deleted only after the store's checksum of the uploaded
//! archive matches the checksum computed while writing it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod request;

pub use config::{BundleConfig, ConfigError, CONFIG_FILE_NAME, DEFAULT_DELETE_BATCH_SIZE};
pub use error::{BundleError, BundleResult};
pub use orchestrator::ArchiveOrchestrator;
pub use report::ArchiveFailure;
pub use request::{ArchiveRequest, ArchiveResponse};
