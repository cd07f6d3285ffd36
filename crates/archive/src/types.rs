//! Archive options and results

use crate::error::{ArchiveError, ArchiveWriteResult};
use xzbundle_core::Crc32;

/// Media type advertised when uploading an archive
pub const TAR_XZ_CONTENT_TYPE: &str = "application/tar+xz";

/// File extension for archives
pub const TAR_XZ_EXTENSION: &str = ".tar.xz";

/// Tar block size; headers and bodies are padded to this
pub const TAR_BLOCK_SIZE: u64 = 512;

/// Default xz preset (maximum compression)
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Highest valid xz preset
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// liblzma's `LZMA_PRESET_EXTREME` flag
const PRESET_EXTREME: u32 = 1 << 31;

/// Options for building an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// xz preset (0-9, default: 9)
    pub compression_level: u32,

    /// Use the slower "extreme" variant of the preset (default: false)
    pub extreme: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            extreme: false,
        }
    }
}

impl ArchiveOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression level (builder pattern).
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the extreme flag (builder pattern).
    pub fn with_extreme(mut self, extreme: bool) -> Self {
        self.extreme = extreme;
        self
    }

    /// Validate options.
    pub fn validate(&self) -> ArchiveWriteResult<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ArchiveError::InvalidOptions(format!(
                "compression level {} is above the maximum of {}",
                self.compression_level, MAX_COMPRESSION_LEVEL
            )));
        }
        Ok(())
    }

    /// The preset value handed to liblzma
    pub fn preset(&self) -> u32 {
        if self.extreme {
            self.compression_level | PRESET_EXTREME
        } else {
            self.compression_level
        }
    }
}

/// Information about a closed archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    /// Bytes written to the output (compressed)
    pub byte_size: u64,

    /// CRC-32 of exactly those bytes
    pub checksum: Crc32,

    /// Number of entries in the archive
    pub entry_count: u64,

    /// Sum of entry body sizes (uncompressed)
    pub input_bytes: u64,
}

impl ArchiveResult {
    /// Checksum in the encoding remote stores report
    pub fn encoded_checksum(&self) -> String {
        self.checksum.encode()
    }
}
