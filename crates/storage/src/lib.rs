//! Object storage collaborators for xzbundle
//!
//! The archive run talks to storage only through the [`ObjectStore`] trait:
//! - paginated listing of `{key, size}` under a container and prefix
//! - streaming reads of one object
//! - streaming writes that report the store's own CRC-32 of what arrived
//! - best-effort bulk delete
//!
//! # Backends
//!
//! - [`MemoryObjectStore`] -- `BTreeMap` behind a `RwLock`, for tests and
//!   embedding
//! - [`LocalObjectStore`] -- a directory per container on the local
//!   filesystem, with atomic writes
//!
//! [`ObjectListing`] turns page-at-a-time listing into a lazy iterator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod listing;
pub mod local;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use listing::ObjectListing;
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use traits::ObjectStore;
pub use types::{DeleteFailure, DeleteReport, ListPage, ObjectSummary, PutReceipt};

/// Default number of objects returned per listing page
pub const DEFAULT_PAGE_SIZE: usize = 1000;
