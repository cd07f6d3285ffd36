//! Integration tests for complete archive runs.
//!
//! Runs go through the public `ArchiveOrchestrator` against the memory and
//! local filesystem stores, with an instrumented wrapper to force upload
//! and read failures.

#[path = "../common/mod.rs"]
mod common;

mod local_store;
mod safety;
mod selection;
