//! Trigger input and output
//!
//! Both travel as camelCase JSON. The request also accepts the field names
//! older callers send (`bucketName`, `folder`, `files`, `outputFileName`,
//! `deleteAfterCompress`).

use crate::error::{BundleError, BundleResult};
use serde::{Deserialize, Serialize};

/// What to archive and where to put it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    /// Container holding the sources and receiving the archive
    #[serde(alias = "bucketName")]
    pub container_name: String,

    /// Only objects whose key starts with this are considered
    #[serde(default, alias = "folder", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// When non-empty, archive exactly these keys (in listing order)
    #[serde(default, alias = "files", skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,

    /// Key of the uploaded archive
    #[serde(alias = "outputFileName")]
    pub output_name: String,

    /// Delete the sources once the upload is verified
    #[serde(default, alias = "deleteAfterCompress")]
    pub delete_after_archive: bool,
}

impl ArchiveRequest {
    /// Create a request for everything under `prefix`
    pub fn new(container_name: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            prefix: None,
            keys: Vec::new(),
            output_name: output_name.into(),
            delete_after_archive: false,
        }
    }

    /// Builder: restrict to a prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Builder: archive only these keys
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: delete sources after a verified upload
    pub fn with_delete_after_archive(mut self, delete: bool) -> Self {
        self.delete_after_archive = delete;
        self
    }

    /// Parse a request from JSON
    pub fn from_json(text: &str) -> BundleResult<Self> {
        let request: Self = serde_json::from_str(text)
            .map_err(|e| BundleError::InvalidRequest(format!("malformed request: {}", e)))?;
        request.validate()?;
        Ok(request)
    }

    /// Check required fields
    pub fn validate(&self) -> BundleResult<()> {
        if self.container_name.trim().is_empty() {
            return Err(BundleError::InvalidRequest(
                "container name must not be empty".to_string(),
            ));
        }
        if self.output_name.trim().is_empty() {
            return Err(BundleError::InvalidRequest(
                "output name must not be empty".to_string(),
            ));
        }
        if self.keys.iter().any(|k| k.is_empty()) {
            return Err(BundleError::InvalidRequest(
                "requested keys must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    /// Key the archive was uploaded to
    pub output_name: String,
    /// Archive size as acknowledged by the store
    pub output_byte_size: u64,
    /// Verified CRC-32 of the archive, base64 of the big-endian bytes
    pub checksum_crc32: String,
    /// Objects archived
    pub input_object_count: u64,
    /// Sum of archived object sizes
    pub input_byte_size: u64,
    /// True only when deletion was requested and every source was removed
    pub deleted_inputs: bool,
}
