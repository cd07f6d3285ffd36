//! Object store error types

use std::io;
use thiserror::Error;
use xzbundle_core::ErrorKind;

/// Errors from object store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The container does not exist
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// The object does not exist
    #[error("Object not found: {container}/{key}")]
    ObjectNotFound {
        /// Container searched
        container: String,
        /// Missing key
        key: String,
    },

    /// Key or container name cannot be used safely
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey {
        /// Rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// I/O error from the backend
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create an object-not-found error
    pub fn not_found(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey { .. } => ErrorKind::Config,
            Self::ContainerNotFound(_)
            | Self::ObjectNotFound { .. }
            | Self::Io(_)
            | Self::Backend(_) => ErrorKind::Io,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
