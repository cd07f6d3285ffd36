//! Archive writer error types

use std::io;
use thiserror::Error;
use xzbundle_core::ErrorKind;

/// Errors that can occur while building an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Entry body ended before the declared size was reached
    #[error("Entry '{name}' declared {declared} bytes but its body ended after {actual}")]
    BodyTooShort {
        /// Entry name
        name: String,
        /// Size written into the header
        declared: u64,
        /// Bytes actually read before end of stream
        actual: u64,
    },

    /// Entry body still had bytes after the declared size was copied
    #[error("Entry '{name}' declared {declared} bytes but its body is longer")]
    BodyTooLong {
        /// Entry name
        name: String,
        /// Size written into the header
        declared: u64,
    },

    /// Entry name cannot be stored in the archive
    #[error("Invalid entry name '{name}': {reason}")]
    InvalidEntryName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Entry added after the archive was closed
    #[error("Archive is closed; no further entries can be added")]
    Closed,

    /// Result requested while the archive is still open
    #[error("Archive is still open; close it before reading the result")]
    NotClosed,

    /// A previous entry failed and left the archive unusable
    #[error("Archive is poisoned by an earlier failed entry")]
    Poisoned,

    /// Invalid archive options
    #[error("Invalid archive options: {0}")]
    InvalidOptions(String),

    /// Compressor could not be created
    #[error("Compression error: {0}")]
    Compression(String),

    /// Reading an entry body or writing the output failed
    #[error("IO error writing entry '{name}': {source}")]
    Entry {
        /// Entry being written
        name: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Finalizing a layer of the pipeline failed
    #[error("IO error finishing {layer}: {source}")]
    Finish {
        /// Pipeline layer being finished
        layer: &'static str,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    /// Create an invalid entry name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntryName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression(msg.into())
    }

    /// Create a finish error for a pipeline layer
    pub fn finish(layer: &'static str, source: io::Error) -> Self {
        Self::Finish { layer, source }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BodyTooShort { .. } | Self::BodyTooLong { .. } => ErrorKind::Integrity,
            Self::InvalidEntryName { .. } | Self::Closed | Self::NotClosed | Self::Poisoned => {
                ErrorKind::State
            }
            Self::InvalidOptions(_) => ErrorKind::Config,
            Self::Compression(_) | Self::Entry { .. } | Self::Finish { .. } => ErrorKind::Io,
        }
    }
}

/// Result type for archive operations
pub type ArchiveWriteResult<T> = Result<T, ArchiveError>;
