//! Filesystem-backed object store
//!
//! Each container is a directory under the store root and each key is a
//! `/`-separated path below it. Writes land in a hidden temp file next to
//! the target and are renamed into place, so readers never see a partial
//! object. Content types are accepted but not persisted.

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;
use crate::types::{DeleteFailure, DeleteReport, ListPage, ObjectSummary, PutReceipt};
use crate::DEFAULT_PAGE_SIZE;
use crc32fast::Hasher;
use std::fs;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use xzbundle_core::Crc32;

/// Prefix of in-flight temp files; listings skip them
const STAGING_PREFIX: &str = ".xzbundle-staging-";

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Object store over a local directory tree
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    page_size: usize,
}

impl LocalObjectStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            root: fs::canonicalize(root)?,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Set the maximum objects per listing page (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a container directory if it does not exist
    pub fn create_container(&self, container: &str) -> StoreResult<()> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(dir)?;
        Ok(())
    }

    /// Filesystem path an object is stored at
    pub fn object_path(&self, container: &str, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.container_dir(container)?.join(key))
    }

    fn container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        if container.is_empty()
            || container.starts_with('.')
            || container.contains('/')
            || container.contains('\\')
        {
            return Err(StoreError::invalid_key(container, "invalid container name"));
        }
        Ok(self.root.join(container))
    }

    fn existing_container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        let dir = self.container_dir(container)?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::ContainerNotFound(container.to_string()))
        }
    }

    /// Stream `body` into a temp file beside `path`, hashing as it goes
    fn atomic_write(&self, path: &Path, body: &mut dyn Read) -> StoreResult<PutReceipt> {
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(dir)?;

        let mut hasher = Hasher::new();
        let mut size = 0u64;
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            tmp.write_all(&buf[..n])?;
            hasher.update(&buf[..n]);
            size += n as u64;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        Ok(PutReceipt {
            size,
            checksum_crc32: Crc32::new(hasher.finalize()).encode(),
        })
    }

    /// Collect `(key, size)` for every file under `dir` whose key starts
    /// with `prefix`; directories that cannot hold such a key are skipped.
    fn list_recursive(
        &self,
        base: &Path,
        dir: &Path,
        prefix: &str,
        out: &mut Vec<ObjectSummary>,
    ) -> StoreResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            let key = match path.strip_prefix(base) {
                Ok(rel) => relative_key(rel),
                Err(_) => continue,
            };
            if file_type.is_dir() {
                let dir_key = format!("{}/", key);
                if dir_key.starts_with(prefix) || prefix.starts_with(&dir_key) {
                    self.list_recursive(base, &path, prefix, out)?;
                }
            } else if file_type.is_file() {
                if entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(STAGING_PREFIX)
                    || !key.starts_with(prefix)
                {
                    continue;
                }
                out.push(ObjectSummary::new(key, entry.metadata()?.len()));
            }
        }
        Ok(())
    }
}

fn relative_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reject keys that could escape the container directory or name the
/// same file as another key
fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::invalid_key(key, "empty"));
    }
    if key.starts_with('/') {
        return Err(StoreError::invalid_key(key, "absolute path"));
    }
    if key.contains('\\') {
        return Err(StoreError::invalid_key(key, "contains backslash"));
    }
    if key.ends_with('/') {
        return Err(StoreError::invalid_key(key, "trailing separator"));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StoreError::invalid_key(key, "empty, current or parent segment"));
    }
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    /// Directories have no cursor, so every page walks the part of the
    /// tree under `prefix` and sorts it. A full listing of N objects at page
    /// size P reads the tree about N/P times; raise the page size for large
    /// containers.
    fn list_page(
        &self,
        container: &str,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> StoreResult<ListPage> {
        let dir = self.existing_container_dir(container)?;
        let prefix = prefix.unwrap_or("");

        let mut all = Vec::new();
        self.list_recursive(&dir, &dir, prefix, &mut all)?;
        all.sort_by(|a, b| a.key.cmp(&b.key));

        let mut matching = all
            .into_iter()
            .filter(|o| continuation.map_or(true, |token| o.key.as_str() > token));

        let mut page = ListPage::default();
        page.objects.extend(matching.by_ref().take(self.page_size));
        if matching.next().is_some() {
            page.next_token = page.objects.last().map(|o| o.key.clone());
        }
        Ok(page)
    }

    fn read(&self, container: &str, key: &str) -> StoreResult<Box<dyn Read + Send + '_>> {
        let path = self.object_path(container, key)?;
        match fs::File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found(container, key))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(
        &self,
        container: &str,
        key: &str,
        body: &mut dyn Read,
        content_type: &str,
    ) -> StoreResult<PutReceipt> {
        self.existing_container_dir(container)?;
        let path = self.object_path(container, key)?;
        let receipt = self.atomic_write(&path, body)?;
        tracing::debug!(
            target: "xzbundle::storage",
            container,
            key,
            size = receipt.size,
            content_type,
            "Stored object"
        );
        Ok(receipt)
    }

    fn delete_many(&self, container: &str, keys: &[String]) -> StoreResult<DeleteReport> {
        self.existing_container_dir(container)?;

        let mut report = DeleteReport::default();
        for key in keys {
            let outcome = self
                .object_path(container, key)
                .and_then(|path| match fs::remove_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(e.into()),
                });
            match outcome {
                Ok(()) => report.deleted.push(key.clone()),
                Err(e) => report.failed.push(DeleteFailure {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(report)
    }
}
