//! xz compressing sink

use crate::error::{ArchiveError, ArchiveWriteResult};
use crate::types::ArchiveOptions;
use std::io::{self, Write};
use xz2::stream::{Check, Stream};
use xz2::write::XzEncoder;

/// Compresses everything written to it into a single `.xz` stream.
///
/// The stream carries its own SHA-256 check, independent of any checksum
/// computed downstream. `flush` ends the current xz block, so the pipeline
/// only flushes through [`CompressingSink::finish`].
pub struct CompressingSink<W: Write> {
    encoder: XzEncoder<W>,
}

impl<W: Write> CompressingSink<W> {
    /// Wrap a writer, compressing at the configured preset
    pub fn new(inner: W, options: &ArchiveOptions) -> ArchiveWriteResult<Self> {
        options.validate()?;
        let stream = Stream::new_easy_encoder(options.preset(), Check::Sha256)
            .map_err(|e| ArchiveError::compression(format!("xz encoder: {}", e)))?;
        Ok(Self {
            encoder: XzEncoder::new_stream(inner, stream),
        })
    }

    /// Uncompressed bytes consumed so far
    pub fn total_in(&self) -> u64 {
        self.encoder.total_in()
    }

    /// Compressed bytes produced so far
    pub fn total_out(&self) -> u64 {
        self.encoder.total_out()
    }

    /// Borrow the inner writer
    pub fn get_ref(&self) -> &W {
        self.encoder.get_ref()
    }

    /// Write the xz index and footer, returning the inner writer
    pub fn finish(self) -> io::Result<W> {
        self.encoder.finish()
    }
}

impl<W: Write> Write for CompressingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}
