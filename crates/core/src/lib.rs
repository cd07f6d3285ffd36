//! Core types shared by every xzbundle crate
//!
//! This crate defines the small vocabulary the rest of the system speaks:
//! - ErrorKind: the integrity / I/O / state taxonomy every layer maps into
//! - Stage: the phases of one archive run (listing through cleaning)
//! - Crc32: the archive checksum and its wire encoding
//!
//! Storage backends and the orchestrator both encode checksums through
//! [`Crc32::encode`], so the two sides compare like for like.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod error;
pub mod types;

pub use checksum::{ChecksumDecodeError, Crc32, CRC32_ENCODED_LEN};
pub use error::ErrorKind;
pub use types::Stage;
