//! In-memory object store
//!
//! Containers are `BTreeMap`s so listing order falls out of the map order.
//! Page size is configurable to exercise multi-page listings in tests.

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;
use crate::types::{DeleteReport, ListPage, ObjectSummary, PutReceipt};
use crate::DEFAULT_PAGE_SIZE;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::ops::Bound;
use std::sync::Arc;
use xzbundle_core::Crc32;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Arc<[u8]>,
    content_type: String,
}

type Container = BTreeMap<String, StoredObject>;

/// Object store held entirely in memory
#[derive(Debug)]
pub struct MemoryObjectStore {
    containers: RwLock<BTreeMap<String, Container>>,
    page_size: usize,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(BTreeMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the maximum objects per listing page (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create a container if it does not exist
    pub fn create_container(&self, container: &str) {
        self.containers
            .write()
            .entry(container.to_string())
            .or_default();
    }

    /// Insert an object directly, creating the container as needed
    pub fn insert(&self, container: &str, key: &str, data: impl Into<Vec<u8>>) {
        let object = StoredObject {
            data: Arc::from(data.into()),
            content_type: "application/octet-stream".to_string(),
        };
        self.containers
            .write()
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), object);
    }

    /// Copy out an object's bytes
    pub fn get(&self, container: &str, key: &str) -> Option<Vec<u8>> {
        self.containers
            .read()
            .get(container)
            .and_then(|c| c.get(key))
            .map(|o| o.data.to_vec())
    }

    /// Content type recorded for an object
    pub fn content_type(&self, container: &str, key: &str) -> Option<String> {
        self.containers
            .read()
            .get(container)
            .and_then(|c| c.get(key))
            .map(|o| o.content_type.clone())
    }

    /// Check whether an object exists
    pub fn contains(&self, container: &str, key: &str) -> bool {
        self.containers
            .read()
            .get(container)
            .map_or(false, |c| c.contains_key(key))
    }

    /// All keys in a container, in order
    pub fn keys(&self, container: &str) -> Vec<String> {
        self.containers
            .read()
            .get(container)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn list_page(
        &self,
        container: &str,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        let containers = self.containers.read();
        let objects = containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let prefix = prefix.unwrap_or("");
        let start = match continuation {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Included(prefix.to_string()),
        };

        let mut page = ListPage::default();
        let mut matching = objects
            .range((start, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix));

        for (key, object) in matching.by_ref().take(self.page_size) {
            page.objects
                .push(ObjectSummary::new(key.clone(), object.data.len() as u64));
        }
        if matching.next().is_some() {
            page.next_token = page.objects.last().map(|o| o.key.clone());
        }
        Ok(page)
    }

    fn read(&self, container: &str, key: &str) -> StoreResult<Box<dyn Read + Send + '_>> {
        let data = self
            .containers
            .read()
            .get(container)
            .and_then(|c| c.get(key))
            .map(|o| Arc::clone(&o.data))
            .ok_or_else(|| StoreError::not_found(container, key))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn write(
        &self,
        container: &str,
        key: &str,
        body: &mut dyn Read,
        content_type: &str,
    ) -> StoreResult<PutReceipt> {
        if !self.containers.read().contains_key(container) {
            return Err(StoreError::ContainerNotFound(container.to_string()));
        }

        let mut data = Vec::new();
        body.read_to_end(&mut data)?;
        let receipt = PutReceipt {
            size: data.len() as u64,
            checksum_crc32: Crc32::compute(&data).encode(),
        };

        let object = StoredObject {
            data: Arc::from(data),
            content_type: content_type.to_string(),
        };
        self.containers
            .write()
            .entry(container.to_string())
            .or_default()
            .insert(key.to_string(), object);
        Ok(receipt)
    }

    fn delete_many(&self, container: &str, keys: &[String]) -> StoreResult<DeleteReport> {
        let mut containers = self.containers.write();
        let objects = containers
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;

        let mut report = DeleteReport::default();
        for key in keys {
            objects.remove(key);
            report.deleted.push(key.clone());
        }
        Ok(report)
    }
}
