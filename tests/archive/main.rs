//! Integration tests for the archive pipeline.
//!
//! Archives are decoded with the stock `xz2` and `tar` readers, the same
//! way `tar --xz -xf` would read them.

#[path = "../common/mod.rs"]
mod common;

mod determinism;
mod samples;
