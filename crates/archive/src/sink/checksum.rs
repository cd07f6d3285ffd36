//! Pass-through sink that keeps a running CRC-32

use crc32fast::Hasher;
use std::io::{self, Write};
use xzbundle_core::Crc32;

/// Forwards every byte unchanged and hashes what the inner writer accepted.
pub struct ChecksummingSink<W> {
    inner: W,
    hasher: Hasher,
    bytes_written: u64,
}

impl<W: Write> ChecksummingSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            bytes_written: 0,
        }
    }

    /// Bytes accepted by the inner writer so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Borrow the inner writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the sink, returning the inner writer, the checksum and the
    /// byte count.
    ///
    /// Callers flush first; this does not.
    pub fn into_parts(self) -> (W, Crc32, u64) {
        (
            self.inner,
            Crc32::new(self.hasher.finalize()),
            self.bytes_written,
        )
    }
}

impl<W: Write> Write for ChecksummingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        // Only what the inner writer took; the caller retries the rest.
        self.hasher.update(&buf[..n]);
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
