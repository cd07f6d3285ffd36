//! Archive run errors
//!
//! Every variant aborts the run before any source is deleted. Each error
//! knows the [`Stage`] it happened in and its [`ErrorKind`].

use crate::config::ConfigError;
use thiserror::Error;
use xzbundle_archive::ArchiveError;
use xzbundle_core::{ErrorKind, Stage};
use xzbundle_storage::StoreError;

/// Errors from an archive run
#[derive(Debug, Error)]
pub enum BundleError {
    /// Trigger input is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Requested keys were not in the listing
    #[error("Requested keys not found: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// A storage call failed
    #[error("{stage} failed on '{target}': {source}")]
    Storage {
        /// Stage the call was made in
        stage: Stage,
        /// Object key or container the call addressed
        target: String,
        /// Underlying error
        #[source]
        source: StoreError,
    },

    /// The archive pipeline failed
    #[error("{stage} failed on '{target}': {source}")]
    Archive {
        /// Stage the failure happened in
        stage: Stage,
        /// Entry or archive name
        target: String,
        /// Underlying error
        #[source]
        source: ArchiveError,
    },

    /// Temporary archive file could not be created or reopened
    #[error("Temporary archive file: {0}")]
    TempFile(#[source] std::io::Error),

    /// The store's checksum of the upload differs from the local one
    #[error("Upload of '{key}' failed verification: store reported CRC32 {remote}, expected {local}")]
    ChecksumMismatch {
        /// Uploaded key
        key: String,
        /// Locally computed checksum
        local: String,
        /// Checksum in the store's acknowledgment
        remote: String,
    },
}

impl BundleError {
    /// Create a storage error
    pub fn storage(stage: Stage, target: impl Into<String>, source: StoreError) -> Self {
        Self::Storage {
            stage,
            target: target.into(),
            source,
        }
    }

    /// Create an archive error
    pub fn archive(stage: Stage, target: impl Into<String>, source: ArchiveError) -> Self {
        Self::Archive {
            stage,
            target: target.into(),
            source,
        }
    }

    /// Stage the run was in when it failed
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidRequest(_) | Self::Config(_) | Self::MissingKeys(_) => Stage::Listing,
            Self::Storage { stage, .. } | Self::Archive { stage, .. } => *stage,
            Self::TempFile(_) => Stage::Archiving,
            Self::ChecksumMismatch { .. } => Stage::Verifying,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::MissingKeys(_) => ErrorKind::Config,
            Self::Config(e) => e.kind(),
            Self::Storage { source, .. } => source.kind(),
            Self::Archive { source, .. } => source.kind(),
            Self::TempFile(_) => ErrorKind::Io,
            Self::ChecksumMismatch { .. } => ErrorKind::Integrity,
        }
    }
}

/// Result type for archive runs
pub type BundleResult<T> = Result<T, BundleError>;
