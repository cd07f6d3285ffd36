//! Structured failure report

use crate::error::BundleError;
use serde::{Deserialize, Serialize};
use xzbundle_core::{ErrorKind, Stage};

/// User-facing description of a failed run.
///
/// A failed run never deletes sources, so `deleted_inputs` is always false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveFailure {
    /// Stage the run failed in
    pub stage: Stage,
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Locally computed checksum, for verification failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_checksum: Option<String>,
    /// Checksum the store reported, for verification failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_checksum: Option<String>,
    /// Always false
    pub deleted_inputs: bool,
}

impl ArchiveFailure {
    /// Build the report for an error
    pub fn from_error(error: &BundleError) -> Self {
        let (local_checksum, remote_checksum) = match error {
            BundleError::ChecksumMismatch { local, remote, .. } => {
                (Some(local.clone()), Some(remote.clone()))
            }
            _ => (None, None),
        };
        Self {
            stage: error.stage(),
            kind: error.kind(),
            message: error.to_string(),
            local_checksum,
            remote_checksum,
            deleted_inputs: false,
        }
    }
}

impl From<&BundleError> for ArchiveFailure {
    fn from(error: &BundleError) -> Self {
        Self::from_error(error)
    }
}
