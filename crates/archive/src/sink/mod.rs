//! Byte sinks that make up the lower half of the archive pipeline
//!
//! Both are plain `std::io::Write` adapters that own the writer beneath
//! them. Neither holds more than the chunk it was handed (plus whatever
//! the compressor keeps as its own working window).

pub mod checksum;
pub mod compress;

pub use checksum::ChecksummingSink;
pub use compress::CompressingSink;
