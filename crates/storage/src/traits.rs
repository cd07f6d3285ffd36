//! The object store contract

use crate::error::StoreResult;
use crate::listing::ObjectListing;
use crate::types::{DeleteReport, ListPage, PutReceipt};
use std::io::Read;

/// A flat key/object store grouped into named containers.
///
/// Keys use `/` as a logical separator. Listing order is lexicographic by
/// key and stable across pages.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
pub trait ObjectStore: Send + Sync {
    /// List one page of objects whose key starts with `prefix`.
    ///
    /// `continuation` is the `next_token` of the previous page, or `None` for
    /// the first page.
    fn list_page(
        &self,
        container: &str,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage>;

    /// Open an object for streaming reads
    fn read(&self, container: &str, key: &str) -> StoreResult<Box<dyn Read + Send + '_>>;

    /// Store `body` under `key`, replacing any existing object.
    ///
    /// The receipt carries the store's own CRC-32 of the bytes it received.
    fn write(
        &self,
        container: &str,
        key: &str,
        body: &mut dyn Read,
        content_type: &str,
    ) -> StoreResult<PutReceipt>;

    /// Delete every key in `keys`.
    ///
    /// Missing keys count as deleted. Per-key failures land in the report;
    /// `Err` means the request as a whole failed.
    fn delete_many(&self, container: &str, keys: &[String]) -> StoreResult<DeleteReport>;

    /// Lazily iterate every object under `prefix`, fetching pages on demand
    fn list<'a>(&'a self, container: &'a str, prefix: Option<&'a str>) -> ObjectListing<'a, Self>
    where
        Self: Sized,
    {
        ObjectListing::new(self, container, prefix)
    }
}
