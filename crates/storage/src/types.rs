//! Values exchanged with object stores

/// One listed object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key within its container
    pub key: String,
    /// Size in bytes
    pub size: u64,
}

impl ObjectSummary {
    /// Create a summary
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects on this page, in listing order
    pub objects: Vec<ObjectSummary>,
    /// Token for the next page; `None` on the last page
    pub next_token: Option<String>,
}

/// Acknowledgment of a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    /// Bytes the store received
    pub size: u64,
    /// The store's CRC-32 of those bytes: base64 of the big-endian 4 bytes
    pub checksum_crc32: String,
}

/// A key a bulk delete could not remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    /// Key that was not deleted
    pub key: String,
    /// Backend's reason
    pub reason: String,
}

/// Outcome of a bulk delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Keys removed (or already absent)
    pub deleted: Vec<String>,
    /// Keys that could not be removed
    pub failed: Vec<DeleteFailure>,
}

impl DeleteReport {
    /// True when nothing failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: DeleteReport) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
    }
}
