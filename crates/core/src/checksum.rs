//! Archive checksum and its wire encoding
//!
//! The archive checksum is a CRC-32 (IEEE polynomial) over the finished,
//! compressed archive bytes. Remote stores report their own CRC-32 of what
//! they received as base64 of the big-endian 4-byte value, so the local value
//! is encoded the same way before comparison.
//!
//! The encoded form is always exactly 4 bytes before base64 (8 characters
//! after). Leading zero bytes are kept and the high bit is never treated as
//! a sign, so `0x000000FF` encodes as `AAAA/w==` and `0x80000000` as
//! `gAAAAA==`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length in bytes of the checksum before base64 encoding
pub const CRC32_ENCODED_LEN: usize = 4;

/// A finished CRC-32 value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crc32(u32);

impl Crc32 {
    /// Wrap a raw CRC-32 value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Compute the CRC-32 of a byte slice
    pub fn compute(data: &[u8]) -> Self {
        Self(crc32fast::hash(data))
    }

    /// The raw unsigned value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Big-endian bytes, zero-padded to exactly four
    pub const fn to_be_bytes(self) -> [u8; CRC32_ENCODED_LEN] {
        self.0.to_be_bytes()
    }

    /// Encode as base64 of the big-endian 4-byte form
    pub fn encode(self) -> String {
        BASE64.encode(self.to_be_bytes())
    }

    /// Parse a base64 checksum as reported by a remote store
    ///
    /// Anything that does not decode to exactly four bytes is rejected.
    pub fn decode(encoded: &str) -> Result<Self, ChecksumDecodeError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| ChecksumDecodeError::Base64(e.to_string()))?;
        let raw: [u8; CRC32_ENCODED_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ChecksumDecodeError::Length(bytes.len()))?;
        Ok(Self(u32::from_be_bytes(raw)))
    }
}

impl From<u32> for Crc32 {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Errors parsing an encoded checksum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecksumDecodeError {
    /// Not valid base64
    #[error("Invalid base64 checksum: {0}")]
    Base64(String),

    /// Decoded to the wrong number of bytes
    #[error("Checksum must decode to 4 bytes, got {0}")]
    Length(usize),
}
