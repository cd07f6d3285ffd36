//! Streaming tar.xz archive writer
//!
//! Entries are framed with GNU tar headers and copied straight through the
//! compressor into the output in bounded chunks. The declared size goes
//! into the header before the body is read, so the body is checked against
//! it as it is copied: a short body fails the copy, and a body with bytes
//! left over fails right after it.

use crate::error::{ArchiveError, ArchiveWriteResult};
use crate::sink::{ChecksummingSink, CompressingSink};
use crate::types::{ArchiveOptions, ArchiveResult};
use std::io::{self, Read, Write};
use tar::{Builder, EntryType, Header};
use tracing::{debug, trace};

type Pipeline<W> = Builder<CompressingSink<ChecksummingSink<W>>>;

enum State<W: Write> {
    Open(Pipeline<W>),
    Poisoned,
    Closed {
        result: ArchiveResult,
        sink: W,
    },
}

/// Writer for tar.xz archives
///
/// Owns the whole pipeline (tar framing, xz compressor, CRC-32 layer, and
/// the output) from construction until [`close`](Self::close).
///
/// # States
///
/// - **Open**: accepting entries
/// - **Closed**: trailer written, [`ArchiveResult`] available
/// - **Poisoned**: an entry failed part way; nothing more can be written
///   and the archive can never be closed into a result
pub struct ArchiveWriter<W: Write> {
    state: State<W>,
    entry_count: u64,
    input_bytes: u64,
}

impl<W: Write> ArchiveWriter<W> {
    /// Build the pipeline over `sink`
    pub fn new(sink: W, options: &ArchiveOptions) -> ArchiveWriteResult<Self> {
        let checksummed = ChecksummingSink::new(sink);
        let compressed = CompressingSink::new(checksummed, options)?;
        debug!(
            level = options.compression_level,
            extreme = options.extreme,
            "Opened archive writer"
        );
        Ok(Self {
            state: State::Open(Builder::new(compressed)),
            entry_count: 0,
            input_bytes: 0,
        })
    }

    /// Append one entry, copying exactly `declared_size` bytes from `body`
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::BodyTooShort`] / [`ArchiveError::BodyTooLong`] when
    ///   the body does not match `declared_size`
    /// - [`ArchiveError::Entry`] when reading the body or writing the output
    ///   fails
    /// - [`ArchiveError::Closed`] / [`ArchiveError::Poisoned`] when the
    ///   archive no longer accepts entries
    /// - [`ArchiveError::InvalidEntryName`] for names tar cannot carry
    ///
    /// Every error except an invalid name poisons the writer.
    pub fn put_entry<R: Read>(
        &mut self,
        name: &str,
        declared_size: u64,
        body: R,
    ) -> ArchiveWriteResult<()> {
        let builder = match &mut self.state {
            State::Open(builder) => builder,
            State::Closed { .. } => return Err(ArchiveError::Closed),
            State::Poisoned => return Err(ArchiveError::Poisoned),
        };
        validate_entry_name(name)?;

        let mut header = entry_header(declared_size);
        let mut body = SizedBody::new(body, declared_size);
        let outcome = match builder.append_data(&mut header, name, &mut body) {
            Ok(()) => body.ensure_exhausted(name),
            Err(e) => Err(body.classify(name, e)),
        };

        if let Err(e) = outcome {
            debug!(entry = name, error = %e, "Entry failed, archive poisoned");
            self.state = State::Poisoned;
            return Err(e);
        }

        self.entry_count += 1;
        self.input_bytes += declared_size;
        trace!(entry = name, size = declared_size, "Appended entry");
        Ok(())
    }

    /// Finish every layer and return the archive's size and checksum
    ///
    /// Layers are finished top down: tar end-of-archive blocks, then the xz
    /// index and footer, then the checksum layer and output are flushed.
    /// Calling `close` again returns the same result without writing.
    pub fn close(&mut self) -> ArchiveWriteResult<ArchiveResult> {
        match std::mem::replace(&mut self.state, State::Poisoned) {
            State::Open(builder) => {
                let (sink, result) =
                    finish_pipeline(builder, self.entry_count, self.input_bytes)?;
                debug!(
                    entries = result.entry_count,
                    bytes = result.byte_size,
                    checksum = %result.checksum,
                    "Closed archive"
                );
                self.state = State::Closed {
                    result: result.clone(),
                    sink,
                };
                Ok(result)
            }
            State::Closed { result, sink } => {
                let again = result.clone();
                self.state = State::Closed { result, sink };
                Ok(again)
            }
            State::Poisoned => Err(ArchiveError::Poisoned),
        }
    }

    /// Result of a closed archive
    pub fn result(&self) -> ArchiveWriteResult<&ArchiveResult> {
        match &self.state {
            State::Closed { result, .. } => Ok(result),
            State::Open(_) => Err(ArchiveError::NotClosed),
            State::Poisoned => Err(ArchiveError::Poisoned),
        }
    }

    /// Close (if still open) and hand back the output
    pub fn finish(mut self) -> ArchiveWriteResult<(ArchiveResult, W)> {
        self.close()?;
        match self.state {
            State::Closed { result, sink } => Ok((result, sink)),
            _ => Err(ArchiveError::Poisoned),
        }
    }

    /// Entries appended so far
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Whether the writer still accepts entries
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Whether the writer was closed successfully
    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed { .. })
    }
}

fn finish_pipeline<W: Write>(
    builder: Pipeline<W>,
    entry_count: u64,
    input_bytes: u64,
) -> ArchiveWriteResult<(W, ArchiveResult)> {
    let compressing = builder
        .into_inner()
        .map_err(|e| ArchiveError::finish("tar", e))?;
    let mut checksumming = compressing
        .finish()
        .map_err(|e| ArchiveError::finish("xz", e))?;
    checksumming
        .flush()
        .map_err(|e| ArchiveError::finish("output", e))?;

    let (sink, checksum, byte_size) = checksumming.into_parts();
    Ok((
        sink,
        ArchiveResult {
            byte_size,
            checksum,
            entry_count,
            input_bytes,
        },
    ))
}

/// Header for a regular file entry
///
/// mtime, uid and gid are zeroed so identical inputs give identical bytes.
fn entry_header(size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header
}

fn validate_entry_name(name: &str) -> ArchiveWriteResult<()> {
    if name.is_empty() {
        return Err(ArchiveError::invalid_name(name, "empty"));
    }
    if name.contains('\0') {
        return Err(ArchiveError::invalid_name(name, "contains NUL"));
    }
    if name.starts_with('/') {
        return Err(ArchiveError::invalid_name(name, "absolute path"));
    }
    // tar normalizes these away, so the extracted name would differ
    if name
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(ArchiveError::invalid_name(name, "empty, current or parent segment"));
    }
    Ok(())
}

/// Reader that yields at most `declared` bytes and notices short bodies
struct SizedBody<R> {
    inner: R,
    declared: u64,
    copied: u64,
    ended_early: bool,
}

impl<R: Read> SizedBody<R> {
    fn new(inner: R, declared: u64) -> Self {
        Self {
            inner,
            declared,
            copied: 0,
            ended_early: false,
        }
    }

    fn classify(&self, name: &str, err: io::Error) -> ArchiveError {
        if self.ended_early {
            ArchiveError::BodyTooShort {
                name: name.to_string(),
                declared: self.declared,
                actual: self.copied,
            }
        } else {
            ArchiveError::Entry {
                name: name.to_string(),
                source: err,
            }
        }
    }

    /// Probe for a byte past the declared size
    fn ensure_exhausted(&mut self, name: &str) -> ArchiveWriteResult<()> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    return Err(ArchiveError::BodyTooLong {
                        name: name.to_string(),
                        declared: self.declared,
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ArchiveError::Entry {
                        name: name.to_string(),
                        source: e,
                    })
                }
            }
        }
    }
}

impl<R: Read> Read for SizedBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.declared - self.copied;
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = remaining.min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 {
            self.ended_early = true;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "body ended after {} of {} bytes",
                    self.copied, self.declared
                ),
            ));
        }
        self.copied += n as u64;
        Ok(n)
    }
}
