//! Lazy iteration over paginated listings

use crate::error::StoreResult;
use crate::traits::ObjectStore;
use crate::types::ObjectSummary;
use std::collections::VecDeque;

/// Iterator over every object under a prefix.
///
/// Pages are fetched only when the previous one is drained. A listing error
/// is yielded once and ends the iteration.
pub struct ObjectListing<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    container: &'a str,
    prefix: Option<&'a str>,
    buffered: VecDeque<ObjectSummary>,
    next_token: Option<String>,
    pages_fetched: usize,
    exhausted: bool,
}

impl<'a, S: ObjectStore + ?Sized> ObjectListing<'a, S> {
    /// Start a listing; nothing is fetched until the first `next`
    pub fn new(store: &'a S, container: &'a str, prefix: Option<&'a str>) -> Self {
        Self {
            store,
            container,
            prefix,
            buffered: VecDeque::new(),
            next_token: None,
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Pages requested from the store so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn fetch_page(&mut self) -> StoreResult<()> {
        let page = self
            .store
            .list_page(self.container, self.prefix, self.next_token.as_deref())?;
        self.pages_fetched += 1;
        tracing::trace!(
            target: "xzbundle::storage",
            container = self.container,
            page = self.pages_fetched,
            objects = page.objects.len(),
            "Fetched listing page"
        );
        self.buffered.extend(page.objects);
        self.next_token = page.next_token;
        if self.next_token.is_none() {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl<'a, S: ObjectStore + ?Sized> Iterator for ObjectListing<'a, S> {
    type Item = StoreResult<ObjectSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(object) = self.buffered.pop_front() {
                return Some(Ok(object));
            }
            if self.exhausted {
                return None;
            }
            // Empty pages with a token are legal; keep going.
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}
