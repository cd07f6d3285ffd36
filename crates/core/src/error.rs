//! Error taxonomy shared across layers
//!
//! Every crate keeps its own `thiserror` enum and maps its variants onto one
//! of these kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bytes did not match what was declared or what the remote received
    Integrity,
    /// A source, sink or backend operation failed
    Io,
    /// The API was driven out of order (write after close and the like)
    State,
    /// Configuration or request input was invalid
    Config,
}

impl ErrorKind {
    /// Stable lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Integrity => "integrity",
            ErrorKind::Io => "io",
            ErrorKind::State => "state",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
