//! Streaming tar.xz archive writer
//!
//! Builds a `.tar.xz` archive one entry at a time without ever holding a
//! whole entry or the whole archive in memory, and reports the CRC-32 of
//! the exact bytes that reached the output.
//!
//! ## Pipeline
//!
//! ```text
//! entry bytes ─► ArchiveWriter (tar framing, 512-byte blocks)
//!             ─► CompressingSink (xz / LZMA2, SHA-256 check)
//!             ─► ChecksummingSink (running CRC-32, bytes untouched)
//!             ─► output (file, Vec<u8>, ...)
//! ```
//!
//! Each layer owns the one below it. `ArchiveWriter::close` tears the chain
//! down top to bottom so the checksum covers the xz trailer too.
//!
//! ## Usage
//!
//! ```ignore
//! let mut writer = ArchiveWriter::new(file, &ArchiveOptions::default())?;
//! writer.put_entry("photos/bird.jpg", 87_940, body)?;
//! let result = writer.close()?;
//! println!("{} bytes, crc32 {}", result.byte_size, result.checksum);
//! ```
//!
//! ## Guarantees
//!
//! - **Exact sizes**: an entry whose body is shorter or longer than declared
//!   fails with an integrity error and poisons the writer
//! - **Deterministic**: same entries, same order, same options produce the
//!   same bytes (mtime, uid and gid are zeroed)
//! - **Single close**: closing twice returns the first result and writes
//!   nothing further

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod sink;
pub mod types;
pub mod writer;

pub use error::{ArchiveError, ArchiveWriteResult};
pub use sink::{ChecksummingSink, CompressingSink};
pub use types::{
    ArchiveOptions, ArchiveResult, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL,
    TAR_BLOCK_SIZE, TAR_XZ_CONTENT_TYPE, TAR_XZ_EXTENSION,
};
pub use writer::ArchiveWriter;
