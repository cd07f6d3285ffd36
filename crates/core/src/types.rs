//! Run stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an archive run
///
/// A run moves strictly forward:
/// `Listing → Archiving → Uploading → Verifying → Cleaning → Done`.
/// Cleaning is skipped when deletion is not requested. A failure in any
/// phase ends the run; no phase is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Enumerating source objects
    Listing,
    /// Streaming sources into the archive
    Archiving,
    /// Sending the finished archive to the store
    Uploading,
    /// Comparing local and remote checksums
    Verifying,
    /// Deleting the archived sources
    Cleaning,
    /// Run finished
    Done,
}

impl Stage {
    /// Stable lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Listing => "listing",
            Stage::Archiving => "archiving",
            Stage::Uploading => "uploading",
            Stage::Verifying => "verifying",
            Stage::Cleaning => "cleaning",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
